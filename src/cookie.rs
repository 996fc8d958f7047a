use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use md5::{Digest, Md5};

/// Lowercase hex MD5 of the password's UTF-8 bytes.
pub fn digest(password: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// `base64(username:md5hex(password))`, padded standard alphabet.
pub fn make_cookie(username: &str, password: &str) -> String {
    let login = format!("{username}:{}", digest(password));
    BASE64.encode(login.as_bytes())
}

#[cfg(test)]
mod test {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    use crate::cookie::{digest, make_cookie};

    fn decode(cookie: &str) -> String {
        String::from_utf8(BASE64.decode(cookie).unwrap()).unwrap()
    }

    #[test]
    fn empty_digest() {
        assert_eq!(digest(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn digest_is_lower_hex() {
        for pw in ["peter", "Hunter2", "  spaced  ", "pässwörd", "\u{1F36A}"] {
            let d = digest(pw);
            assert_eq!(d.len(), 32);
            assert!(d.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
            assert_eq!(d, digest(pw));
        }
    }

    #[test]
    fn known_cookie() {
        assert_eq!(digest("peter"), "51dc30ddc473d43a6011e9ebba6ca770");
        assert_eq!(
            make_cookie("wiener", "peter"),
            "d2llbmVyOjUxZGMzMGRkYzQ3M2Q0M2E2MDExZTllYmJhNmNhNzcw"
        );
        assert_eq!(
            make_cookie("carlos", ""),
            "Y2FybG9zOmQ0MWQ4Y2Q5OGYwMGIyMDRlOTgwMDk5OGVjZjg0Mjdl"
        );
    }

    #[test]
    fn cookie_decodes_to_login() {
        let pairs = [("wiener", "peter"), ("", ""), ("a:b", "c:d"), ("ユーザー", "パス")];
        for (user, pw) in pairs {
            let cookie = make_cookie(user, pw);
            assert_eq!(decode(&cookie), format!("{user}:{}", digest(pw)));
        }
    }
}
