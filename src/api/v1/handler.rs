use super::cookie::CookieExchange;
use super::error::*;
use crate::application_port::{AuthService, LoginInput};
use crate::logger::*;
use crate::server::Username;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::reply::Response;
use warp::{self, Reply, reject};

type Auth = Arc<dyn AuthService<Username, CookieExchange>>;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: Username,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse;

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub username: Username,
    pub admin: bool,
}

pub async fn login(
    body: LoginRequest,
    mut exchange: CookieExchange,
    auth_service: Auth,
) -> Result<Response, warp::Rejection> {
    let login_input = LoginInput {
        username: body.username.clone(),
        password: body.password,
    };
    auth_service
        .login(&mut exchange, login_input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let response = UserResponse {
        username: body.username,
    };
    Ok(exchange.into_response(warp::reply::json(&ApiResponse::ok(response))))
}

/// Always answers with the clearing cookie, even when the session was unknown.
pub async fn logout(
    mut exchange: CookieExchange,
    auth_service: Auth,
) -> Result<Response, warp::Rejection> {
    let reply = match auth_service.logout(&mut exchange).await {
        Ok(()) => warp::reply::json(&ApiResponse::ok(LogoutResponse)).into_response(),
        Err(e) => {
            debug!(error = %e, "logout failed");
            let code = ApiErrorCode::from(e);
            let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
            warp::reply::with_status(json, code.status()).into_response()
        }
    };
    Ok(exchange.into_response(reply))
}

pub async fn me(username: Username) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&ApiResponse::ok(UserResponse { username })))
}

pub async fn admin(username: Username) -> Result<impl warp::Reply, warp::Rejection> {
    info!(%username, "admin area accessed");
    Ok(warp::reply::json(&ApiResponse::ok(AdminResponse {
        username,
        admin: true,
    })))
}
