mod demo_checker;
mod server;

pub use demo_checker::*;
pub use server::*;
