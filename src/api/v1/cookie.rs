use crate::domain_model::{Cookie, is_cookie_name, is_cookie_path, is_cookie_value};
use crate::domain_port::{CookieTransport, TransportError};
use cookie::SameSite;
use std::convert::Infallible;
use time::OffsetDateTime;
use warp::Filter;
use warp::http::header::{COOKIE, SET_COOKIE};
use warp::http::{HeaderMap, HeaderValue};
use warp::reply::{Reply, Response};

/// Per-request cookie context: what the client sent and what we send back.
#[derive(Debug, Default)]
pub struct CookieExchange {
    inbound: Vec<HeaderValue>,
    outbound: Vec<(Cookie, HeaderValue)>,
}

impl CookieExchange {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            inbound: headers.get_all(COOKIE).iter().cloned().collect(),
            outbound: Vec::new(),
        }
    }

    pub fn outbound(&self) -> impl Iterator<Item = &Cookie> {
        self.outbound.iter().map(|(cookie, _)| cookie)
    }

    fn find(&self, name: &str) -> Result<Option<String>, TransportError> {
        for header in &self.inbound {
            let raw = header
                .to_str()
                .map_err(|e| TransportError::Malformed(e.to_string()))?;
            // Unparseable pairs belong to someone else; skip them.
            let found = cookie::Cookie::split_parse(raw)
                .flatten()
                .find(|c| c.name() == name);
            if let Some(c) = found {
                return Ok(Some(c.value_trimmed().to_string()));
            }
        }
        Ok(None)
    }

    /// Attach every queued cookie to `reply` as a `Set-Cookie` header.
    pub fn into_response(self, reply: impl Reply) -> Response {
        let mut response = reply.into_response();
        for (_, value) in self.outbound {
            response.headers_mut().append(SET_COOKIE, value);
        }
        response
    }
}

/// `Set-Cookie` value for `cookie`, refusing anything that would inject
/// extra attributes.
pub fn render_set_cookie(cookie: &Cookie) -> Result<String, TransportError> {
    if !is_cookie_name(&cookie.name) {
        return Err(TransportError::Write(format!("invalid cookie name {:?}", cookie.name)));
    }
    if !is_cookie_path(&cookie.path) {
        return Err(TransportError::Write(format!("invalid cookie path {:?}", cookie.path)));
    }
    if !is_cookie_value(&cookie.value) {
        return Err(TransportError::Write("invalid cookie value".to_string()));
    }
    let expires = OffsetDateTime::from_unix_timestamp(cookie.expires.timestamp())
        .map_err(|e| TransportError::Write(e.to_string()))?;

    let rendered = cookie::Cookie::build((cookie.name.as_str(), cookie.value.as_str()))
        .path(cookie.path.as_str())
        .expires(expires)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    Ok(rendered.to_string())
}

#[derive(Debug, Default)]
pub struct WarpCookieTransport;

impl CookieTransport for WarpCookieTransport {
    type Ctx = CookieExchange;

    fn cookie(&self, ctx: &CookieExchange, name: &str) -> Result<Option<String>, TransportError> {
        Ok(ctx.find(name)?.filter(|value| !value.is_empty()))
    }

    fn set_cookie(&self, ctx: &mut CookieExchange, cookie: Cookie) -> Result<(), TransportError> {
        let value = HeaderValue::from_str(&render_set_cookie(&cookie)?)
            .map_err(|e| TransportError::Write(e.to_string()))?;
        ctx.outbound.push((cookie, value));
        Ok(())
    }
}

pub fn with_exchange() -> impl Filter<Extract = (CookieExchange,), Error = Infallible> + Clone {
    warp::header::headers_cloned().map(|headers: HeaderMap| CookieExchange::from_headers(&headers))
}
