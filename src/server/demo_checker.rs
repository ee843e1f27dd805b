use crate::domain_port::*;
use crate::settings::DemoUser;
use std::collections::{BTreeSet, HashMap};

/// Credential table read from the settings file, for running the demo server.
/// Passwords are compared as plain text; do not use it for anything real.
pub struct DemoChecker {
    users: HashMap<String, DemoUser>,
}

impl DemoChecker {
    pub fn try_new(users: &[DemoUser]) -> anyhow::Result<Self> {
        let mut table = HashMap::with_capacity(users.len());
        for user in users {
            if table.insert(user.username.clone(), user.clone()).is_some() {
                return Err(anyhow::anyhow!("duplicate demo user: {}", user.username));
            }
        }
        Ok(Self { users: table })
    }
}

#[async_trait::async_trait]
impl CredentialChecker<String> for DemoChecker {
    async fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, CheckerError> {
        Ok(self
            .users
            .get(username)
            .is_some_and(|user| user.password == password))
    }

    async fn user_id(&self, username: &str) -> Result<String, CheckerError> {
        self.users
            .get(username)
            .map(|user| user.username.clone())
            .ok_or_else(|| CheckerError::UnknownUser(username.to_string()))
    }

    fn permissions(&self) -> Option<&dyn PermissionChecker<String>> {
        Some(self)
    }
}

/// All-of: the user must hold every permission in `required`.
#[async_trait::async_trait]
impl PermissionChecker<String> for DemoChecker {
    async fn has_permissions(
        &self,
        user: &String,
        required: &BTreeSet<String>,
    ) -> Result<bool, CheckerError> {
        let Some(user) = self.users.get(user) else {
            return Ok(false);
        };
        Ok(required.iter().all(|p| user.permissions.contains(p)))
    }
}
