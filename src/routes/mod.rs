//! Route table assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route is registered through one [`Mux`] whose root stack runs the
//! request context (session cookie, request span) and then the trailing
//! slash redirect. `/admin` adds authorization; the static asset route adds
//! prefix stripping and immutable caching.
//!
//! | key                               | handler                      |
//! |-----------------------------------|------------------------------|
//! | `GET /admin/messages`             | [`admin::list_messages`]     |
//! | `DELETE /admin/messages/{id}`     | [`admin::delete_message`]    |
//! | `GET /admin/user`                 | [`admin::user`]              |
//! | `POST /auth/signout`              | [`auth::signout`]            |
//! | `GET /blog/{slug}`                | [`blog::show`]               |
//! | `GET /contact`                    | [`contact::form`]            |
//! | `POST /contact`                   | [`contact::submit`]          |
//! | `GET /presentations/{slug}`       | [`presentations::show`]      |
//! | `GET /resume`                     | [`resume::show`]             |
//! | `GET /static/{cache_id}/{*path}`  | static files                 |
//! | `GET /`                           | [`index::show`]              |
//! | anything else                     | [`not_found::show`]          |

pub mod admin;
pub mod auth;
pub mod blog;
pub mod contact;
pub mod index;
pub mod not_found;
pub mod presentations;
pub mod resume;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use axum::Router;

use crate::middleware::authorization::authorization;
use crate::middleware::context::request_context;
use crate::middleware::static_files::{immutable_cache, static_handler, strip_prefix};
use crate::middleware::trailing_slash::trailing_slash;
use crate::mux::{Mux, MuxError};
use crate::state::AppState;

/// Build the route table for `state`.
///
/// # Errors
///
/// Returns [`MuxError`] if two routes resolve to the same key.
pub fn app(state: AppState) -> Result<Router, MuxError> {
    Ok(mux(state)?.into_router())
}

/// The populated route tree, before conversion to a router.
///
/// # Errors
///
/// Same as [`app`].
pub fn mux(state: AppState) -> Result<Mux<AppState>, MuxError> {
    let root = Mux::new(state.clone(), [request_context(state.cookie_secure), trailing_slash()]);

    let guard = authorization(Arc::clone(&state.sessions), Arc::clone(&state.policy));
    root.group_with("/admin", [guard], |admin_mux| {
        admin_mux.group_with("/messages", [], |messages_mux| {
            messages_mux.handle_fn("GET", admin::list_messages, [])?;
            messages_mux.handle_fn("DELETE /{id}", admin::delete_message, [])
        })?;
        admin_mux.handle_fn("GET /user", admin::user, [])
    })?;

    root.group_with("/auth", [], |auth_mux| auth_mux.handle_fn("POST /signout", auth::signout, []))?;

    root.handle_fn("GET /blog/{slug}", blog::show, [])?;

    root.group_with("/contact", [], |contact_mux| {
        contact_mux.handle_fn("GET", contact::form, [])?;
        contact_mux.handle_fn("POST", contact::submit, [])
    })?;

    root.handle_fn("GET /presentations/{slug}", presentations::show, [])?;
    root.handle_fn("GET /resume", resume::show, [])?;

    root.handle(
        &format!("GET {}/{{*path}}", state.static_prefix),
        static_handler(&state.static_dir),
        [strip_prefix(&state.static_prefix), immutable_cache()],
    )?;

    root.handle_fn("GET /", index::show, [])?;
    root.fallback_fn(not_found::show)?;

    tracing::info!(routes = root.dispatch_keys().len(), "route table built");
    Ok(root)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
