//! # Gatekeeper (session gating for axum)
//!
//! `gatekeeper` guards axum routes with sessions issued by an Ory Kratos
//! compatible identity provider. Each guarded request triggers a single call to
//! the provider's `whoami` endpoint with the browser's cookies.
//!
//! ## Gates
//!
//! - [`middleware::require_auth`]: a session is mandatory. Missing sessions are
//!   sent to the login flow; a `403` from the provider sends the browser to the
//!   login flow with `aal=aal2` to collect a second factor.
//! - [`middleware::set_session`]: a session is attached when present, and the
//!   request continues either way.
//! - [`middleware::require_no_auth`]: signed-in browsers are sent to `welcome`.
//!
//! The resolved [`kratos::Session`] is stored in the request extensions, so
//! handlers read it with `Extension<Session>`.
//!
//! ## Route options
//!
//! Gates are built from a [`route::RouteOptionsCreator`], which hands out the
//! provider API handles and branding for the request being served.

pub mod app;
pub mod cli;
pub mod flow;
pub mod kratos;
pub mod middleware;
pub mod route;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
