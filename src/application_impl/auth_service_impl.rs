use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_memory::MemorySessionStore;
use crate::logger::*;
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Cookie-session [`AuthService`] composed from a checker, a store and a
/// cookie transport.
///
/// Holds no session state itself: every lookup goes to the store.
pub struct SessionAuthService<U: Identity, Ctx: Send + Sync + 'static> {
    checker: Arc<dyn CredentialChecker<U>>,
    store: Arc<dyn SessionStore<U>>,
    transport: Arc<dyn CookieTransport<Ctx = Ctx>>,
    config: CookieConfig,
}

impl<U: Identity, Ctx: Send + Sync + 'static> SessionAuthService<U, Ctx> {
    pub fn builder(
        checker: Arc<dyn CredentialChecker<U>>,
        transport: Arc<dyn CookieTransport<Ctx = Ctx>>,
    ) -> SessionAuthServiceBuilder<U, Ctx> {
        SessionAuthServiceBuilder {
            checker,
            transport,
            store: None,
            config: CookieConfig::default(),
        }
    }

    pub fn config(&self) -> &CookieConfig {
        &self.config
    }

    fn session_token(&self, ctx: &Ctx) -> Result<Option<SessionToken>, AuthError> {
        let value = self.transport.cookie(ctx, &self.config.name)?;
        Ok(value.filter(|v| !v.is_empty()).map(SessionToken))
    }
}

#[async_trait::async_trait]
impl<U, Ctx> AuthService<U, Ctx> for SessionAuthService<U, Ctx>
where
    U: Identity,
    Ctx: Send + Sync + 'static,
{
    async fn login(&self, ctx: &mut Ctx, request: LoginInput) -> Result<(), AuthError> {
        let LoginInput { username, password } = request;

        let ok = self
            .checker
            .check_credentials(&username, &password)
            .await
            .inspect_err(|e| error!(%username, error = %e, "credential check failed"))?;
        if !ok {
            warn!(%username, "login rejected");
            return Err(AuthError::NotAuthorized);
        }

        let user = self.checker.user_id(&username).await?;

        let token = self
            .store
            .create_session(user)
            .await
            .inspect_err(|e| error!(error = %e, "could not create session"))?;

        // No rollback: if the write fails the session stays in the store.
        let cookie = Cookie::session(&self.config, &token, Utc::now())?;
        self.transport.set_cookie(ctx, cookie).inspect_err(|e| {
            warn!(token = %token.redacted(), error = %e, "session created but cookie not written")
        })?;

        debug!(%username, token = %token.redacted(), "logged in");
        Ok(())
    }

    async fn logout(&self, ctx: &mut Ctx) -> Result<(), AuthError> {
        let deleted = match self.session_token(ctx)? {
            Some(token) => {
                let result = self.store.delete_session(&token).await;
                debug!(token = %token.redacted(), ok = result.is_ok(), "logout");
                result.map_err(AuthError::from)
            }
            None => {
                debug!("logout without session cookie");
                Ok(())
            }
        };

        self.transport.set_cookie(ctx, Cookie::expired(&self.config))?;
        deleted
    }

    async fn is_logged(&self, ctx: &Ctx) -> Result<bool, AuthError> {
        let Some(token) = self.session_token(ctx)? else {
            return Ok(false);
        };
        self.store.user_for_session(&token).await?;
        Ok(true)
    }

    async fn request_user(&self, ctx: &Ctx) -> Result<Option<U>, AuthError> {
        let Some(token) = self.session_token(ctx)? else {
            return Ok(None);
        };
        let user = self.store.user_for_session(&token).await?;
        Ok(Some(user))
    }

    async fn has_permissions(
        &self,
        user: &U,
        required: &BTreeSet<String>,
    ) -> Result<bool, AuthError> {
        let Some(permissions) = self.checker.permissions() else {
            error!(?required, "permission check attempted without a permission checker");
            return Err(AuthError::NoPermissionChecker);
        };
        let allowed = permissions.has_permissions(user, required).await?;
        trace!(?user, ?required, allowed, "permission check");
        Ok(allowed)
    }
}

/// Construction-time overrides for [`SessionAuthService`]. Later calls win.
pub struct SessionAuthServiceBuilder<U: Identity, Ctx: Send + Sync + 'static> {
    checker: Arc<dyn CredentialChecker<U>>,
    transport: Arc<dyn CookieTransport<Ctx = Ctx>>,
    store: Option<Arc<dyn SessionStore<U>>>,
    config: CookieConfig,
}

impl<U: Identity, Ctx: Send + Sync + 'static> SessionAuthServiceBuilder<U, Ctx> {
    pub fn cookie_config(mut self, config: CookieConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn cookie_path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    pub fn cookie_duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore<U>>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fails when the accumulated cookie settings could not produce a sound
    /// `Set-Cookie` header.
    pub fn build(self) -> Result<SessionAuthService<U, Ctx>, CookieConfigError> {
        self.config.validate()?;
        let store: Arc<dyn SessionStore<U>> = match self.store {
            Some(store) => store,
            None => Arc::new(MemorySessionStore::<U>::new()),
        };
        Ok(SessionAuthService {
            checker: self.checker,
            store,
            transport: self.transport,
            config: self.config,
        })
    }
}
