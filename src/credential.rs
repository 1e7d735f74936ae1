//! API credentials.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Credential attached to every request as an `Authorization` header.
///
/// Zendesk accepts three schemes: email + password (basic), email + API
/// token (basic with a `/token` suffix on the email), and OAuth bearer
/// tokens.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Email and password.
    Basic { email: String, password: String },
    /// Email and API token.
    ApiToken { email: String, token: String },
    /// OAuth access token.
    Bearer { token: String },
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { email, .. } => f
                .debug_struct("Basic")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::ApiToken { email, .. } => f
                .debug_struct("ApiToken")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

impl Credential {
    /// Email + password credential.
    pub fn basic(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Email + API token credential.
    pub fn api_token(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self::ApiToken {
            email: email.into(),
            token: token.into(),
        }
    }

    /// OAuth bearer token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Value for the `Authorization` request header.
    pub fn authorization_header(&self) -> String {
        match self {
            Self::Basic { email, password } => {
                format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
            }
            Self::ApiToken { email, token } => {
                format!("Basic {}", STANDARD.encode(format!("{email}/token:{token}")))
            }
            Self::Bearer { token } => format!("Bearer {token}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header() {
        let cred = Credential::basic("agent@example.com", "hunter2");
        let expected = format!("Basic {}", STANDARD.encode("agent@example.com:hunter2"));
        assert_eq!(cred.authorization_header(), expected);
    }

    #[test]
    fn test_api_token_header_appends_token_suffix() {
        let cred = Credential::api_token("agent@example.com", "abc123");
        let expected = format!("Basic {}", STANDARD.encode("agent@example.com/token:abc123"));
        assert_eq!(cred.authorization_header(), expected);
    }

    #[test]
    fn test_bearer_header() {
        let cred = Credential::bearer("oauth-token");
        assert_eq!(cred.authorization_header(), "Bearer oauth-token");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let debug = format!(
            "{:?} {:?} {:?}",
            Credential::basic("a@b.c", "pw-secret"),
            Credential::api_token("a@b.c", "tok-secret"),
            Credential::bearer("bearer-secret")
        );
        assert!(debug.contains("a@b.c"));
        assert!(!debug.contains("pw-secret"));
        assert!(!debug.contains("tok-secret"));
        assert!(!debug.contains("bearer-secret"));
    }
}
