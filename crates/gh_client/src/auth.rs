use std::fmt;

use http::header::InvalidHeaderValue;
use http::HeaderValue;

#[derive(Clone, PartialEq, Eq)]
pub struct GithubToken {
    secret: String,
}

impl GithubToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for GithubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GithubToken(***)")
    }
}

/// Whether requests go out with a token. Drives the `Authorization` header,
/// the wording of rate-limit and 401 errors, and which inference passes run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated(GithubToken),
}

impl AuthContext {
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(secret) if !secret.trim().is_empty() => {
                AuthContext::Authenticated(GithubToken::new(secret.trim()))
            }
            _ => AuthContext::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated(_))
    }

    pub fn authorization(&self) -> Result<Option<HeaderValue>, InvalidHeaderValue> {
        match self {
            AuthContext::Anonymous => Ok(None),
            AuthContext::Authenticated(token) => {
                let mut value = HeaderValue::from_str(&format!("token {}", token.secret()))?;
                value.set_sensitive(true);
                Ok(Some(value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_anonymous() {
        assert_eq!(AuthContext::from_token(None), AuthContext::Anonymous);
        assert_eq!(
            AuthContext::from_token(Some("  ".into())),
            AuthContext::Anonymous
        );
    }

    #[test]
    fn authenticated_header_uses_token_scheme() {
        let auth = AuthContext::from_token(Some("abc123".into()));
        let header = auth.authorization().unwrap().unwrap();
        assert_eq!(header.to_str().unwrap(), "token abc123");
        assert!(header.is_sensitive());
    }

    #[test]
    fn debug_output_hides_secret() {
        let auth = AuthContext::from_token(Some("supersecret".into()));
        assert!(!format!("{auth:?}").contains("supersecret"));
    }
}
