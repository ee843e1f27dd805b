use crate::domain_model::Identity;
use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("checker backend error: {0}")]
    Backend(String),
}

#[async_trait::async_trait]
pub trait CredentialChecker<U: Identity>: Send + Sync {
    /// `Ok(false)` covers both a bad password and an unknown user.
    async fn check_credentials(&self, username: &str, password: &str)
    -> Result<bool, CheckerError>;

    /// Map an accepted username to the identity stored in the session.
    async fn user_id(&self, username: &str) -> Result<U, CheckerError>;

    /// Permission capability, if this checker has one.
    fn permissions(&self) -> Option<&dyn PermissionChecker<U>> {
        None
    }
}

#[async_trait::async_trait]
pub trait PermissionChecker<U: Identity>: Send + Sync {
    /// Whether `user` satisfies `required`. All-of versus any-of is up to the
    /// implementation.
    async fn has_permissions(
        &self,
        user: &U,
        required: &BTreeSet<String>,
    ) -> Result<bool, CheckerError>;
}

pub type CheckFuture<T> = Pin<Box<dyn Future<Output = Result<T, CheckerError>> + Send>>;

type CredentialsFn = dyn Fn(String, String) -> CheckFuture<bool> + Send + Sync;
type UserIdFn<U> = dyn Fn(String) -> CheckFuture<U> + Send + Sync;
type PermissionsFn<U> = dyn Fn(U, BTreeSet<String>) -> CheckFuture<bool> + Send + Sync;

/// Checker assembled from closures.
///
/// Only reports the permission capability when [`FnChecker::with_permissions`]
/// was called.
pub struct FnChecker<U: Identity> {
    credentials: Arc<CredentialsFn>,
    user_id: Arc<UserIdFn<U>>,
    permissions: Option<Arc<PermissionsFn<U>>>,
}

impl<U: Identity> FnChecker<U> {
    pub fn new<C, CF, I, IF>(credentials: C, user_id: I) -> Self
    where
        C: Fn(String, String) -> CF + Send + Sync + 'static,
        CF: Future<Output = Result<bool, CheckerError>> + Send + 'static,
        I: Fn(String) -> IF + Send + Sync + 'static,
        IF: Future<Output = Result<U, CheckerError>> + Send + 'static,
    {
        Self {
            credentials: Arc::new(move |u: String, p: String| {
                Box::pin(credentials(u, p)) as CheckFuture<bool>
            }),
            user_id: Arc::new(move |u: String| Box::pin(user_id(u)) as CheckFuture<U>),
            permissions: None,
        }
    }

    pub fn with_permissions<P, PF>(mut self, permissions: P) -> Self
    where
        P: Fn(U, BTreeSet<String>) -> PF + Send + Sync + 'static,
        PF: Future<Output = Result<bool, CheckerError>> + Send + 'static,
    {
        self.permissions = Some(Arc::new(move |u: U, r: BTreeSet<String>| {
            Box::pin(permissions(u, r)) as CheckFuture<bool>
        }));
        self
    }
}

#[async_trait::async_trait]
impl<U: Identity> CredentialChecker<U> for FnChecker<U> {
    async fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, CheckerError> {
        (self.credentials)(username.to_string(), password.to_string()).await
    }

    async fn user_id(&self, username: &str) -> Result<U, CheckerError> {
        (self.user_id)(username.to_string()).await
    }

    fn permissions(&self) -> Option<&dyn PermissionChecker<U>> {
        match self.permissions {
            Some(_) => Some(self),
            None => None,
        }
    }
}

#[async_trait::async_trait]
impl<U: Identity> PermissionChecker<U> for FnChecker<U> {
    async fn has_permissions(
        &self,
        user: &U,
        required: &BTreeSet<String>,
    ) -> Result<bool, CheckerError> {
        match &self.permissions {
            Some(permissions) => permissions(user.clone(), required.clone()).await,
            None => Err(CheckerError::Backend(
                "permission function not configured".to_string(),
            )),
        }
    }
}
