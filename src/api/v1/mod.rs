mod cookie;
mod error;
mod handler;
mod router;

pub use self::cookie::*;
pub use error::{ApiError, ApiErrorCode, recover_error};
pub use handler::ApiResponse;
pub use router::{require_login, require_permissions, routes};
