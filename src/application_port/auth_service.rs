use crate::domain_model::{CookieConfigError, Identity};
use crate::domain_port::{CheckerError, StoreError, TransportError};
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not authorized")]
    NotAuthorized,
    #[error("session not found")]
    SessionNotFound,
    #[error("no permission checker configured")]
    NoPermissionChecker,
    #[error("store error: {0}")]
    Store(#[source] StoreError),
    #[error("checker error: {0}")]
    Checker(#[from] CheckerError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("cookie error: {0}")]
    Cookie(#[from] CookieConfigError),
}

impl AuthError {
    /// Misconfiguration rather than a per-request condition; the request path
    /// must stop here.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AuthError::NoPermissionChecker)
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SessionNotFound => AuthError::SessionNotFound,
            err => AuthError::Store(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Session-cookie login/logout and authorization over a request context `Ctx`.
#[async_trait::async_trait]
pub trait AuthService<U: Identity, Ctx: Send + Sync + 'static>: Send + Sync {
    async fn login(&self, ctx: &mut Ctx, request: LoginInput) -> Result<(), AuthError>;
    async fn logout(&self, ctx: &mut Ctx) -> Result<(), AuthError>;
    async fn is_logged(&self, ctx: &Ctx) -> Result<bool, AuthError>;
    /// `Ok(None)` when the request carries no session cookie.
    async fn request_user(&self, ctx: &Ctx) -> Result<Option<U>, AuthError>;
    async fn has_permissions(
        &self,
        user: &U,
        required: &BTreeSet<String>,
    ) -> Result<bool, AuthError>;
}
