//! Route table with prefix groups and declarative middleware.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route setup builds one [`Mux`] tree at startup. Every router derived from
//! the root through [`Mux::group`] or [`Mux::using`] registers into the same
//! dispatch table; only the path prefix and the middleware stack are forked
//! per branch. [`Mux::into_router`] turns the finished table into an
//! `axum::Router`, after which nothing is mutated.
//!
//! PATTERNS
//! ========
//! A pattern is `"PATH"` or `"METHOD PATH"`. A single token naming one of the
//! nine standard methods is a bare method (the path is the group prefix);
//! any other single token is a path matching every method. When the prefix
//! ends in `/` and the path starts with `/`, one slash is dropped.
//!
//! Registration fails fast: duplicate keys, unknown methods, and paths that
//! are empty or relative are rejected with a [`MuxError`]. Captures must fill
//! a whole segment (`{name}`, or `{*name}` as the last segment), and two
//! paths differing only in capture names conflict.

mod stack;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use axum::Router;
use axum::handler::Handler as AxumHandler;
use axum::routing::{MethodFilter, MethodRouter};

pub use stack::{Handler, Middleware, Next, SharedMiddleware, Stack, from_fn, from_layer};

// =============================================================================
// METHODS AND KEYS
// =============================================================================

/// The HTTP methods a pattern may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl RouteMethod {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "CONNECT" => Some(Self::Connect),
            "OPTIONS" => Some(Self::Options),
            "TRACE" => Some(Self::Trace),
            "PATCH" => Some(Self::Patch),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
        }
    }

    fn filter(self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Head => MethodFilter::HEAD,
            Self::Post => MethodFilter::POST,
            Self::Put => MethodFilter::PUT,
            Self::Delete => MethodFilter::DELETE,
            Self::Connect => MethodFilter::CONNECT,
            Self::Options => MethodFilter::OPTIONS,
            Self::Trace => MethodFilter::TRACE,
            Self::Patch => MethodFilter::PATCH,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved route: optional method plus prefixed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    pub method: Option<RouteMethod>,
    pub path: String,
}

impl DispatchKey {
    /// Resolve `pattern` relative to `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`MuxError::UnknownMethod`] when a two-token pattern starts
    /// with something other than a standard method.
    pub fn resolve(prefix: &str, pattern: &str) -> Result<Self, MuxError> {
        let (method, path) = match pattern.split_once(' ') {
            Some((token, path)) => {
                let method = RouteMethod::parse(token).ok_or_else(|| MuxError::UnknownMethod {
                    method: token.to_owned(),
                    pattern: pattern.to_owned(),
                })?;
                (Some(method), path)
            }
            None => match RouteMethod::parse(pattern) {
                Some(method) => (Some(method), ""),
                None => (None, pattern),
            },
        };

        let prefix = match prefix.strip_suffix('/') {
            Some(trimmed) if path.starts_with('/') => trimmed,
            _ => prefix,
        };

        Ok(Self { method, path: format!("{prefix}{path}") })
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            Some(method) => write!(f, "{method} {}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MuxError {
    #[error("route {key:?} is already registered")]
    Conflict { key: String },
    #[error("unknown method {method:?} in route pattern {pattern:?}")]
    UnknownMethod { method: String, pattern: String },
    #[error("route pattern {pattern:?} resolves to an empty path")]
    EmptyPath { pattern: String },
    #[error("route {key:?} must have a path starting with '/'")]
    InvalidPath { key: String },
    #[error("route {key:?} has a malformed segment {segment:?}")]
    InvalidSegment { key: String, segment: String },
    #[error("a fallback handler is already registered")]
    DuplicateFallback,
}

// =============================================================================
// DISPATCH TABLE
// =============================================================================

#[derive(Default)]
struct PathRoutes {
    methods: Vec<(RouteMethod, Handler)>,
    any: Option<Handler>,
}

impl PathRoutes {
    fn into_method_router(self) -> MethodRouter {
        let mut router = MethodRouter::new();
        for (method, handler) in self.methods {
            router = router.on_service(method.filter(), handler);
        }
        if let Some(any) = self.any {
            router = router.fallback_service(any);
        }
        router
    }
}

#[derive(Default)]
struct Table {
    keys: Vec<DispatchKey>,
    paths: BTreeMap<String, PathRoutes>,
    fallback: Option<Handler>,
}

impl Table {
    fn insert(&mut self, key: DispatchKey, handler: Handler) -> Result<(), MuxError> {
        if self.keys.contains(&key) {
            return Err(MuxError::Conflict { key: key.to_string() });
        }
        let shape = path_shape(&key.path);
        if self.paths.keys().any(|path| *path != key.path && path_shape(path) == shape) {
            return Err(MuxError::Conflict { key: key.to_string() });
        }

        let routes = self.paths.entry(key.path.clone()).or_default();
        match key.method {
            Some(method) => routes.methods.push((method, handler)),
            None => routes.any = Some(handler),
        }
        self.keys.push(key);
        Ok(())
    }
}

/// First segment of `path` axum would refuse: a capture that does not fill
/// the segment, an empty or repeated capture name, a catch-all before the
/// end, or the old `:name` / `*name` syntax.
fn invalid_segment(path: &str) -> Option<&str> {
    let segments: Vec<&str> = path.split('/').skip(1).collect();
    let mut names: Vec<&str> = Vec::new();

    for (index, segment) in segments.iter().copied().enumerate() {
        if segment.starts_with([':', '*']) {
            return Some(segment);
        }
        if !segment.contains(['{', '}']) {
            continue;
        }

        let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
            return Some(segment);
        };
        let (catch_all, name) = match inner.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, inner),
        };
        let malformed = name.is_empty() || name.contains(['{', '}', '*', ':']) || names.contains(&name);
        if malformed || (catch_all && index + 1 != segments.len()) {
            return Some(segment);
        }
        names.push(name);
    }
    None
}

/// `path` with capture names erased: `/a/{id}` and `/a/{slug}` share a shape.
fn path_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix('{') {
            Some(inner) if inner.starts_with('*') => "{*}",
            Some(_) => "{}",
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

// =============================================================================
// MUX
// =============================================================================

/// A router node: a path prefix and middleware stack over a shared table.
///
/// `S` is the application state handed to axum handlers registered through
/// [`Mux::handle_fn`].
pub struct Mux<S = ()> {
    stack: Stack,
    prefix: String,
    state: S,
    table: Rc<RefCell<Table>>,
}

impl<S> Mux<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// A root router whose every route is wrapped by `middleware`.
    pub fn new(state: S, middleware: impl IntoIterator<Item = SharedMiddleware>) -> Self {
        Self {
            stack: Stack::new().with(middleware),
            prefix: String::new(),
            state,
            table: Rc::default(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Register `handler` at `pattern`, wrapped by this router's stack plus
    /// `middleware`.
    ///
    /// # Errors
    ///
    /// Fails when the pattern does not resolve to a valid, unused key.
    pub fn handle(
        &self,
        pattern: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = SharedMiddleware>,
    ) -> Result<(), MuxError> {
        let key = DispatchKey::resolve(&self.prefix, pattern)?;
        if key.path.is_empty() {
            return Err(MuxError::EmptyPath { pattern: pattern.to_owned() });
        }
        if !key.path.starts_with('/') {
            return Err(MuxError::InvalidPath { key: key.to_string() });
        }
        if let Some(segment) = invalid_segment(&key.path) {
            return Err(MuxError::InvalidSegment { key: key.to_string(), segment: segment.to_owned() });
        }

        let handler = self.stack.with(middleware).apply(handler);
        tracing::debug!(%key, "route registered");
        self.table.borrow_mut().insert(key, handler)
    }

    /// Register an axum handler function bound to this router's state.
    ///
    /// # Errors
    ///
    /// Same as [`Mux::handle`].
    pub fn handle_fn<H, T>(
        &self,
        pattern: &str,
        handler: H,
        middleware: impl IntoIterator<Item = SharedMiddleware>,
    ) -> Result<(), MuxError>
    where
        H: AxumHandler<T, S>,
        T: 'static,
    {
        self.handle(pattern, Handler::from_axum(handler, self.state.clone()), middleware)
    }

    /// Register the handler for requests no route matches.
    ///
    /// # Errors
    ///
    /// Returns [`MuxError::DuplicateFallback`] if one is already registered.
    pub fn fallback_fn<H, T>(&self, handler: H) -> Result<(), MuxError>
    where
        H: AxumHandler<T, S>,
        T: 'static,
    {
        let handler = self.stack.apply(Handler::from_axum(handler, self.state.clone()));
        let mut table = self.table.borrow_mut();
        if table.fallback.is_some() {
            return Err(MuxError::DuplicateFallback);
        }
        table.fallback = Some(handler);
        Ok(())
    }

    /// A child router under `prefix` with `middleware` appended to the stack.
    #[must_use]
    pub fn group(&self, prefix: &str, middleware: impl IntoIterator<Item = SharedMiddleware>) -> Self {
        Self {
            stack: self.stack.with(middleware),
            prefix: format!("{}{prefix}", self.prefix),
            state: self.state.clone(),
            table: Rc::clone(&self.table),
        }
    }

    /// [`Mux::group`], then populate the child with `register`.
    ///
    /// # Errors
    ///
    /// Propagates the first registration error from `register`.
    pub fn group_with<F>(
        &self,
        prefix: &str,
        middleware: impl IntoIterator<Item = SharedMiddleware>,
        register: F,
    ) -> Result<Self, MuxError>
    where
        F: FnOnce(&Self) -> Result<(), MuxError>,
    {
        let child = self.group(prefix, middleware);
        register(&child)?;
        Ok(child)
    }

    /// A child router with the same prefix and `middleware` appended.
    #[must_use]
    pub fn using(&self, middleware: impl IntoIterator<Item = SharedMiddleware>) -> Self {
        self.group("", middleware)
    }

    /// [`Mux::using`], then populate the child with `register`.
    ///
    /// # Errors
    ///
    /// Propagates the first registration error from `register`.
    pub fn using_with<F>(
        &self,
        middleware: impl IntoIterator<Item = SharedMiddleware>,
        register: F,
    ) -> Result<Self, MuxError>
    where
        F: FnOnce(&Self) -> Result<(), MuxError>,
    {
        self.group_with("", middleware, register)
    }

    /// Resolved keys in registration order, across the whole tree.
    #[must_use]
    pub fn dispatch_keys(&self) -> Vec<String> {
        self.table.borrow().keys.iter().map(ToString::to_string).collect()
    }

    /// Drain the shared table into an `axum::Router`.
    pub fn into_router(self) -> Router {
        let table = std::mem::take(&mut *self.table.borrow_mut());

        let mut router = Router::new();
        for (path, routes) in table.paths {
            router = router.route(&path, routes.into_method_router());
        }
        if let Some(fallback) = table.fallback {
            router = router.fallback_service(fallback);
        }
        router
    }
}

impl<S> fmt::Debug for Mux<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mux")
            .field("prefix", &self.prefix)
            .field("stack", &self.stack)
            .field("routes", &self.table.borrow().keys.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
