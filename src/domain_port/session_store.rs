use crate::domain_model::*;

#[async_trait::async_trait]
pub trait SessionStore<U: Identity>: Send + Sync {
    /// Issue a fresh token bound to `user`. The token is visible to lookups
    /// as soon as this returns.
    async fn create_session(&self, user: U) -> Result<SessionToken, StoreError>;
    /// Resolve a token back to its user.
    async fn user_for_session(&self, token: &SessionToken) -> Result<U, StoreError>;
    /// Remove a token. Deleting an unknown token reports `SessionNotFound`.
    async fn delete_session(&self, token: &SessionToken) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session not found")]
    SessionNotFound,
    #[error("token generation failed: {0}")]
    TokenGeneration(String),
    #[error("store backend error: {0}")]
    Backend(String),
}
