use crate::api::v1::{CookieExchange, WarpCookieTransport};
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::CookieConfig;
use crate::domain_port::*;
use crate::logger::*;
use crate::server::DemoChecker;
use crate::settings::Settings;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Identity type the HTTP layer works with.
pub type Username = String;

pub struct Server {
    pub auth_service: Arc<dyn AuthService<Username, CookieExchange>>,
    pub admin_permissions: BTreeSet<String>,
}

impl Server {
    pub fn new(
        auth_service: Arc<dyn AuthService<Username, CookieExchange>>,
        admin_permissions: BTreeSet<String>,
    ) -> Self {
        Self {
            auth_service,
            admin_permissions,
        }
    }

    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        if settings.users.is_empty() {
            warn!("no demo users configured; every login will be rejected");
        }
        let checker: Arc<dyn CredentialChecker<Username>> =
            Arc::new(DemoChecker::try_new(&settings.users)?);
        let cookie_config = CookieConfig::try_from(&settings.session)?;
        info!(?cookie_config, "session cookie");

        let auth_service: SessionAuthService<Username, CookieExchange> =
            SessionAuthService::builder(checker, Arc::new(WarpCookieTransport))
                .cookie_config(cookie_config)
                .build()?;

        Ok(Self::new(
            Arc::new(auth_service),
            BTreeSet::from([settings.permissions.admin.clone()]),
        ))
    }
}
