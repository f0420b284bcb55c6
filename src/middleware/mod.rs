//! Site middleware, built on [`crate::mux::Middleware`].
//!
//! SYSTEM CONTEXT
//! ==============
//! The root router runs [`context::request_context`] then
//! [`trailing_slash::trailing_slash`] on every request. `/admin` adds
//! [`authorization::authorization`], and the static asset route adds
//! [`static_files::strip_prefix`] and [`static_files::immutable_cache`].

pub mod authorization;
pub mod context;
pub mod static_files;
pub mod trailing_slash;

pub use context::RequestContext;
