use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use crate::domain_port::TransportError;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let code = if let Some(code) = err.find::<ApiErrorCode>() {
        code.clone()
    } else if err.is_not_found() {
        ApiErrorCode::NotFound
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some() {
        ApiErrorCode::BadRequest
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiErrorCode::NotFound
    } else {
        warn!("Unhandled rejection: {:?}", err);
        ApiErrorCode::InternalError
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
    Ok(warp::reply::with_status(json, code.status()))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Invalid username or password")]
    NotAuthorized,
    #[error("Session is not valid")]
    InvalidSession,
    #[error("Not logged in")]
    LoginRequired,
    #[error("Missing required permissions")]
    Forbidden,
    #[error("Malformed request")]
    BadRequest,
    #[error("Not found")]
    NotFound,
    #[error("Server is misconfigured")]
    Misconfigured,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::NotAuthorized
            | ApiErrorCode::InvalidSession
            | ApiErrorCode::LoginRequired => StatusCode::UNAUTHORIZED,
            ApiErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ApiErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::Misconfigured | ApiErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::NotAuthorized => ApiErrorCode::NotAuthorized,
            AuthError::SessionNotFound => ApiErrorCode::InvalidSession,
            AuthError::NoPermissionChecker => {
                error!("permission-gated route served without a permission checker");
                ApiErrorCode::Misconfigured
            }
            AuthError::Transport(TransportError::Malformed(e)) => {
                warn!("Malformed cookie: {}", e);
                ApiErrorCode::BadRequest
            }
            e => ApiErrorCode::internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::CookieConfigError;
    use crate::domain_port::{CheckerError, StoreError};

    #[test]
    fn auth_errors_map_to_statuses() {
        let cases = [
            (AuthError::NotAuthorized, StatusCode::UNAUTHORIZED),
            (AuthError::SessionNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::NoPermissionChecker, StatusCode::INTERNAL_SERVER_ERROR),
            (
                AuthError::Store(StoreError::Backend("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Checker(CheckerError::Backend("ldap".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Cookie(CookieConfigError::ExpiryOverflow),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Transport(TransportError::Malformed("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiErrorCode::from(error).status(), status);
        }
    }
}
