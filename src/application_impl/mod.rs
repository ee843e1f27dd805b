mod auth_service_impl;

pub use auth_service_impl::*;
