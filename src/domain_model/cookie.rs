use super::SessionToken;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

pub const DEFAULT_COOKIE_NAME: &str = "sid";
pub const DEFAULT_COOKIE_PATH: &str = "/";
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::from_secs(7 * 24 * 60 * 60); // 7 days
/// Browsers cap cookie lifetimes at 400 days.
pub const MAX_COOKIE_DURATION: Duration = Duration::from_secs(400 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieConfigError {
    #[error("invalid cookie name: {0:?}")]
    InvalidName(String),
    #[error("invalid cookie path: {0:?}")]
    InvalidPath(String),
    #[error("cookie duration {0:?} is zero or exceeds {max:?}", max = MAX_COOKIE_DURATION)]
    InvalidDuration(Duration),
    #[error("cookie expiry out of range")]
    ExpiryOverflow,
}

/// Shape of the cookie that carries the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub duration: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            path: DEFAULT_COOKIE_PATH.to_string(),
            duration: DEFAULT_COOKIE_DURATION,
        }
    }
}

impl CookieConfig {
    pub fn validate(&self) -> Result<(), CookieConfigError> {
        if !is_cookie_name(&self.name) {
            return Err(CookieConfigError::InvalidName(self.name.clone()));
        }
        if !is_cookie_path(&self.path) {
            return Err(CookieConfigError::InvalidPath(self.path.clone()));
        }
        if self.duration.is_zero() || self.duration > MAX_COOKIE_DURATION {
            return Err(CookieConfigError::InvalidDuration(self.duration));
        }
        Ok(())
    }
}

/// RFC 6265 token: visible ASCII minus separators.
pub fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

/// Absolute path of printable ASCII without `;`.
pub fn is_cookie_path(path: &str) -> bool {
    path.starts_with('/') && path.bytes().all(|b| (0x20..0x7f).contains(&b) && b != b';')
}

/// RFC 6265 cookie-octets; empty is allowed.
pub fn is_cookie_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_graphic() && !b"\",;\\".contains(&b))
}

/// Wire-level cookie handed to a [`crate::domain_port::CookieTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub path: String,
    pub value: String,
    pub expires: DateTime<Utc>,
}

impl Cookie {
    /// Cookie issuing `token`, valid for the configured duration from `now`.
    pub fn session(
        config: &CookieConfig,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Self, CookieConfigError> {
        let expires = TimeDelta::from_std(config.duration)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(CookieConfigError::ExpiryOverflow)?;
        Ok(Self {
            name: config.name.clone(),
            path: config.path.clone(),
            value: token.0.clone(),
            expires,
        })
    }

    /// Replacement cookie instructing the client to drop its session cookie.
    pub fn expired(config: &CookieConfig) -> Self {
        Self {
            name: config.name.clone(),
            path: config.path.clone(),
            value: String::new(),
            expires: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}
