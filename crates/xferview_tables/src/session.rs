use std::sync::Arc;

use xferview_host::CookieStore;

/// Cookie carrying the backend's request token.
pub const CSRF_COOKIE: &str = "csrftoken";

#[derive(Clone)]
pub struct SessionTokenAccessor {
    cookies: Arc<dyn CookieStore>,
}

impl SessionTokenAccessor {
    pub fn new(cookies: Arc<dyn CookieStore>) -> Self {
        Self { cookies }
    }

    /// Decoded value of the first cookie named exactly `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        find_cookie(&self.cookies.cookie_string(), name)
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.get(CSRF_COOKIE)
    }
}

pub fn find_cookie(raw: &str, name: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(percent_decode)
}

/// `%XX` unescaping; a malformed escape or non UTF-8 result yields the input unchanged.
fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] != b'%' {
            decoded.push(bytes[index]);
            index += 1;
            continue;
        }

        let escaped = raw
            .get(index + 1..index + 3)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                decoded.push(byte);
                index += 3;
            }
            None => return raw.to_string(),
        }
    }

    String::from_utf8(decoded).unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use xferview_host::StaticCookieStore;

    use super::{find_cookie, SessionTokenAccessor};

    #[test]
    fn empty_cookie_string_has_no_token() {
        let accessor = SessionTokenAccessor::new(Arc::new(StaticCookieStore::default()));
        assert_eq!(accessor.csrf_token(), None);
    }

    #[test]
    fn exact_name_match_is_decoded() {
        let raw = "sessionid=xyz; csrftoken=a%2Fb%3Dc ; theme=dark";
        assert_eq!(find_cookie(raw, "csrftoken").as_deref(), Some("a/b=c"));
        assert_eq!(find_cookie(raw, "theme").as_deref(), Some("dark"));
    }

    #[test]
    fn substring_names_do_not_match() {
        let raw = "xcsrftoken=wrong; csrftoken_old=stale";
        assert_eq!(find_cookie(raw, "csrftoken"), None);

        let raw = "csrftoken_old=stale; csrftoken=fresh";
        assert_eq!(find_cookie(raw, "csrftoken").as_deref(), Some("fresh"));
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(find_cookie("a=1; a=2", "a").as_deref(), Some("1"));
    }

    #[test]
    fn malformed_escape_returns_raw_value() {
        assert_eq!(find_cookie("t=50%", "t").as_deref(), Some("50%"));
        assert_eq!(find_cookie("t=%zz1", "t").as_deref(), Some("%zz1"));
        assert_eq!(find_cookie("t=%C3%A9", "t").as_deref(), Some("é"));
    }
}
