//! Cookie-session authentication core.
//!
//! A [`application_impl::SessionAuthService`] turns a username and password
//! into an opaque session token, hands it to the client through a
//! [`domain_port::CookieTransport`], and later resolves the presented token
//! back into a user via a [`domain_port::SessionStore`]. Credential and
//! permission checks are delegated to a [`domain_port::CredentialChecker`].

pub mod api;
pub mod logger;
pub mod settings;

pub mod server;

pub mod application_impl;
pub mod application_port;
pub mod domain_model;
pub mod domain_port;
pub mod infra_memory;
