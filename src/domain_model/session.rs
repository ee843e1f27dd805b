use serde::{Deserialize, Serialize};
use std::fmt;

/// Application-defined identity of an authenticated principal.
///
/// The session core never inspects identities, it only stores and hands them
/// back, so any cloneable thread-safe value qualifies.
pub trait Identity: Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> Identity for T where T: Clone + fmt::Debug + Send + Sync + 'static {}

/// Opaque token naming a live session.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short prefix that is safe to put in logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(8).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        SessionToken(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_token_hides_the_tail() {
        let token = SessionToken("0123456789abcdef".to_string());
        assert_eq!(token.redacted(), "01234567…");
        assert!(!token.redacted().contains("89abcdef"));
    }

    #[test]
    fn empty_token_reports_empty() {
        assert!(SessionToken(String::new()).is_empty());
        assert!(!SessionToken("x".into()).is_empty());
    }
}
