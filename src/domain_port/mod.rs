mod cookie_transport;
mod credential_checker;
mod session_store;

pub use cookie_transport::*;
pub use credential_checker::*;
pub use session_store::*;
