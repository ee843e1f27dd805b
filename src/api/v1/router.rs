use super::cookie::{CookieExchange, with_exchange};
use super::error::*;
use super::handler;
use crate::application_port::AuthService;
use crate::server::*;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let login = warp::post()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with_exchange())
        .and(with(server.auth_service.clone()))
        .and_then(handler::login);

    let logout = warp::post()
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(with_exchange())
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    let me = warp::get()
        .and(warp::path("me"))
        .and(warp::path::end())
        .and(require_login(server.auth_service.clone()))
        .and_then(handler::me);

    let admin = warp::get()
        .and(warp::path("admin"))
        .and(warp::path::end())
        .and(require_permissions(
            server.auth_service.clone(),
            server.admin_permissions.clone(),
        ))
        .and_then(handler::admin);

    login.or(logout).or(me).or(admin)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Passes the logged-in user on, rejects anonymous requests.
pub fn require_login(
    auth_service: Arc<dyn AuthService<Username, CookieExchange>>,
) -> impl Filter<Extract = (Username,), Error = warp::Rejection> + Clone {
    with_exchange().and_then(move |exchange: CookieExchange| {
        let auth_service = auth_service.clone();
        async move {
            match auth_service.request_user(&exchange).await {
                Ok(Some(username)) => Ok(username),
                Ok(None) => Err(reject::custom(ApiErrorCode::LoginRequired)),
                Err(e) => Err(reject::custom(ApiErrorCode::from(e))),
            }
        }
    })
}

/// Like [`require_login`], additionally gated on `required`.
pub fn require_permissions(
    auth_service: Arc<dyn AuthService<Username, CookieExchange>>,
    required: BTreeSet<String>,
) -> impl Filter<Extract = (Username,), Error = warp::Rejection> + Clone {
    let required = Arc::new(required);
    require_login(auth_service.clone()).and_then(move |username: Username| {
        let auth_service = auth_service.clone();
        let required = required.clone();
        async move {
            let allowed = auth_service
                .has_permissions(&username, &required)
                .await
                .map_err(ApiErrorCode::from)
                .map_err(reject::custom)?;
            if allowed {
                Ok(username)
            } else {
                Err(reject::custom(ApiErrorCode::Forbidden))
            }
        }
    })
}
