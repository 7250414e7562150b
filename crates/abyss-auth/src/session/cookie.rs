//! Session cookie and bearer header handling.

use abyss_core::config::AuthConfig;

/// How the session cookie is named and flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Cookie name.
    pub name: String,
    /// Add the `Secure` attribute.
    pub secure: bool,
}

impl CookiePolicy {
    /// Builds the policy from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.cookie_secure,
        }
    }

    /// `Set-Cookie` value delivering `token` for `max_age_seconds`.
    pub fn session_cookie(&self, token: &str, max_age_seconds: i64) -> String {
        self.render(token, max_age_seconds)
    }

    /// `Set-Cookie` value that clears the session cookie.
    pub fn expired_cookie(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age_seconds: i64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
            self.name,
            value,
            max_age_seconds.max(0)
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Pulls this policy's cookie out of a `Cookie` request header.
    pub fn extract<'a>(&self, cookie_header: &'a str) -> Option<&'a str> {
        extract_cookie(cookie_header, &self.name)
    }
}

/// Finds `name` in a `Cookie` header.
///
/// Never fails: anything unparseable is skipped. Surrounding whitespace and
/// one pair of double quotes around the value are removed. An empty value
/// counts as absent.
pub fn extract_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
        .filter(|value| !value.is_empty())
}

/// Token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(secure: bool) -> CookiePolicy {
        CookiePolicy {
            name: "token".to_string(),
            secure,
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        assert_eq!(
            policy(false).session_cookie("abc", 3600),
            "token=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=3600"
        );
        assert_eq!(
            policy(true).session_cookie("abc", 3600),
            "token=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=3600; Secure"
        );
    }

    #[test]
    fn test_expired_cookie() {
        assert_eq!(
            policy(false).expired_cookie(),
            "token=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0"
        );
    }

    #[test]
    fn test_extract_cookie() {
        assert_eq!(extract_cookie("token=abc", "token"), Some("abc"));
        assert_eq!(extract_cookie("theme=dark; token=abc.def.ghi", "token"), Some("abc.def.ghi"));
        assert_eq!(extract_cookie(" token = \"q\" ;x=1", "token"), Some("q"));
        assert_eq!(extract_cookie("mytoken=abc", "token"), None);
        assert_eq!(extract_cookie("token=", "token"), None);
        assert_eq!(extract_cookie("", "token"), None);
        assert_eq!(extract_cookie(";;;=;token", "token"), None);
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer("bearer  abc "), Some("abc"));
        assert_eq!(extract_bearer("Basic abc"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Bearer"), None);
    }
}
