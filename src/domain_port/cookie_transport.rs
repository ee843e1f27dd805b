use crate::domain_model::Cookie;

/// Reads and writes the session cookie on a framework-specific request context.
///
/// Implementations hold no state of their own; everything lives in `Ctx`.
pub trait CookieTransport: Send + Sync {
    type Ctx: Send + Sync + 'static;

    /// Value of the cookie called `name`, or `None` when it is absent or empty.
    fn cookie(&self, ctx: &Self::Ctx, name: &str) -> Result<Option<String>, TransportError>;

    fn set_cookie(&self, ctx: &mut Self::Ctx, cookie: Cookie) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("malformed inbound cookie: {0}")]
    Malformed(String),
    #[error("cookie write failed: {0}")]
    Write(String),
}
