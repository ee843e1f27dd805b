mod cookie;
mod session;

pub use self::cookie::*;
pub use session::*;
