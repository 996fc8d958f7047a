use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, error, info};

use crate::cookie::{digest, make_cookie};
use crate::error::Error;
use crate::util::resolve_path;

/// One processed password, handed to the progress callback.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub password: &'a str,
    pub digest: &'a str,
    pub cookie: &'a str,
}

/// Writes one cookie per password to `output`, replacing its content.
///
/// Missing parent directories are created. Returns the number of cookies
/// written, which is always `passwords.len()`. `on_progress` sees every
/// password in order before anything is written.
pub fn generate_cookies<S: AsRef<str>>(
    username: &str,
    passwords: &[S],
    output: &str,
    mut on_progress: impl FnMut(Progress<'_>),
) -> Result<usize, Error> {
    let path = resolve_path(output)?;

    let cookies: Vec<String> = passwords
        .iter()
        .map(|pw| {
            let pw = pw.as_ref();
            let cookie = make_cookie(username, pw);
            on_progress(Progress {
                password: pw,
                digest: &digest(pw),
                cookie: &cookie,
            });
            cookie
        })
        .collect();

    write_lines(&path, &cookies).map_err(|source| {
        error!("write {}: {source}", path.display());
        Error::FileWrite {
            path: path.clone(),
            source,
        }
    })?;
    info!("wrote {} cookies to {}", cookies.len(), path.display());
    Ok(cookies.len())
}

fn write_lines(path: &Path, lines: &[String]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            debug!("create {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(file, "{line}")?;
    }
    file.flush()
}
