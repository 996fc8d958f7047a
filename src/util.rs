use std::io;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;

fn expand_home(p: &str) -> PathBuf {
    let rest = p
        .strip_prefix('~')
        .filter(|rest| rest.is_empty() || rest.starts_with(std::path::is_separator));
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches(std::path::is_separator)),
        (Some(_), None) => {
            warn!("no home directory, keeping {p:?}");
            PathBuf::from(p)
        }
        (None, _) => PathBuf::from(p),
    }
}

/// Absolute, normalized form of a user supplied path.
///
/// Leading `~` is expanded, symlinks of the existing prefix are followed and
/// `..` collapses the previous component. The path does not need to exist.
pub fn resolve_path(raw: &str) -> io::Result<PathBuf> {
    let path = expand_home(raw.trim());
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if resolved.symlink_metadata().is_ok() {
                    if let Ok(real) = resolved.canonicalize() {
                        resolved = real;
                    }
                }
            }
        }
    }
    Ok(resolved)
}

/// Non-empty, trimmed lines of a password list in file order.
pub fn load_password_list(path: &str) -> Result<Vec<String>, Error> {
    let resolved = resolve_path(path)?;
    if !resolved.is_file() {
        return Err(Error::PathNotFound(path.trim().to_string()));
    }
    let bytes = std::fs::read(&resolved)?;
    let passwords = parse_password_list(&bytes);
    debug!(
        "loaded {} passwords from {} ({} bytes)",
        passwords.len(),
        resolved.display(),
        bytes.len()
    );
    Ok(passwords)
}

// Invalid UTF-8 is replaced, not rejected. `\r`, `\n` and `\r\n` all end a line.
fn parse_password_list(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn file_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::error::Error;
    use crate::util::{load_password_list, parse_password_list, resolve_path};

    #[test]
    fn password_list_skips_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passwords.txt");
        std::fs::write(&path, "a\n\nb\n  \nc\n").unwrap();

        let passwords = load_password_list(path.to_str().unwrap()).unwrap();
        assert_eq!(passwords, ["a", "b", "c"]);
    }

    #[test]
    fn password_list_trims_and_keeps_order() {
        let parsed = parse_password_list(b"  zeta \r\nalpha\r\n\t\r\nmid dle\n");
        assert_eq!(parsed, ["zeta", "alpha", "mid dle"]);
        assert!(parse_password_list(b"\n \n\t\n").is_empty());
        assert!(parse_password_list(b"").is_empty());

        // classic Mac line endings
        assert_eq!(parse_password_list(b"a\rb\rc\r"), ["a", "b", "c"]);
        assert_eq!(parse_password_list(b"x\r\ry\n\rz"), ["x", "y", "z"]);
    }

    #[test]
    fn password_list_lossy() {
        let parsed = parse_password_list(b"ok\nbad\xff\xfeend\n\xc3\xa9t\xc3\xa9\n");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], "ok");
        assert!(parsed[1].starts_with("bad") && parsed[1].ends_with("end"));
        assert_eq!(parsed[2], "été");
    }

    #[test]
    fn password_list_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let err = load_password_list(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
        assert!(!path.exists());

        // a directory is not a password list
        let err = load_password_list(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
    }

    #[test]
    fn resolve_parent_segments() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        let raw = format!("  {}/a/b/../../missing/./out.txt \n", base.display());
        assert_eq!(resolve_path(&raw).unwrap(), base.join("missing/out.txt"));
    }

    #[test]
    fn resolve_relative_is_absolute() {
        let resolved = resolve_path("some/relative/../cookies.txt").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/cookies.txt"));
    }

    #[test]
    fn resolve_home() {
        let resolved = resolve_path("~/cookies.txt").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("cookies.txt"));
        assert!(!resolved.to_string_lossy().contains('~'));

        // only a leading tilde is special
        let resolved = resolve_path("/tmp/~x").unwrap();
        assert!(resolved.ends_with(Path::new("~x")));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        std::fs::create_dir(base.join("real")).unwrap();
        std::os::unix::fs::symlink(base.join("real"), base.join("link")).unwrap();

        let raw = format!("{}/link/out.txt", base.display());
        assert_eq!(resolve_path(&raw).unwrap(), base.join("real/out.txt"));
    }
}
