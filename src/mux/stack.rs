//! Middleware stacks and the type-erased handlers they wrap.
//!
//! DESIGN
//! ======
//! A [`Stack`] is an immutable list of middleware. [`Stack::with`] copies the
//! list and appends to the copy, so a parent never observes what its
//! children add. [`Stack::apply`] folds the list from the back: the first
//! registered middleware becomes the outermost wrapper, sees the request
//! first and the response last.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::handler::Handler as AxumHandler;
use axum::response::{IntoResponse, Response};
use tower::util::BoxCloneSyncService;
use tower::{Layer, Service, ServiceExt};

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

// =============================================================================
// HANDLER
// =============================================================================

/// A type-erased request handler: an infallible, cloneable tower service.
#[derive(Clone)]
pub struct Handler {
    inner: BoxCloneSyncService<Request, Response, Infallible>,
}

/// The rest of the chain, as seen from inside a middleware.
pub type Next = Handler;

impl Handler {
    /// Erase any infallible tower service, e.g. a `tower-http` file server.
    pub fn from_service<T>(service: T) -> Self
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse,
        T::Future: Send + 'static,
    {
        let service = service.map_response(|res: T::Response| res.into_response());
        Self { inner: BoxCloneSyncService::new(service) }
    }

    /// Erase an async function of the request.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        Self::from_service(tower::service_fn(move |req| {
            let fut = f(req);
            async move { Ok::<_, Infallible>(fut.await.into_response()) }
        }))
    }

    /// Erase an axum handler function, binding it to `state`.
    pub fn from_axum<H, T, S>(handler: H, state: S) -> Self
    where
        H: AxumHandler<T, S>,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        Self::from_service(handler.with_state(state))
    }

    /// Drive the handler to a response.
    pub async fn run(self, req: Request) -> Response {
        match self.inner.oneshot(req).await {
            Ok(res) => res,
            Err(never) => match never {},
        }
    }
}

impl Service<Request> for Handler {
    type Response = Response;
    type Error = Infallible;
    type Future = HandlerFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        self.inner.call(req)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// A request interceptor: wraps the next handler in the chain.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: Handler) -> Handler;
}

pub type SharedMiddleware = Arc<dyn Middleware>;

/// Middleware from an async `(request, next) -> response` function.
pub fn from_fn<F, Fut>(f: F) -> SharedMiddleware
where
    F: Fn(Request, Next) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(FromFn(f))
}

/// Middleware from a `tower::Layer`.
pub fn from_layer<L>(layer: L) -> SharedMiddleware
where
    L: Layer<Handler> + Send + Sync + 'static,
    L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    <L::Service as Service<Request>>::Response: IntoResponse,
    <L::Service as Service<Request>>::Future: Send + 'static,
{
    Arc::new(FromLayer(layer))
}

struct FromFn<F>(F);

impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn wrap(&self, next: Handler) -> Handler {
        let f = self.0.clone();
        Handler::from_fn(move |req| f(req, next.clone()))
    }
}

struct FromLayer<L>(L);

impl<L> Middleware for FromLayer<L>
where
    L: Layer<Handler> + Send + Sync + 'static,
    L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    <L::Service as Service<Request>>::Response: IntoResponse,
    <L::Service as Service<Request>>::Future: Send + 'static,
{
    fn wrap(&self, next: Handler) -> Handler {
        Handler::from_service(self.0.layer(next))
    }
}

// =============================================================================
// STACK
// =============================================================================

/// An ordered, immutable middleware list.
#[derive(Clone, Default)]
pub struct Stack {
    middleware: Vec<SharedMiddleware>,
}

impl Stack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new stack holding this stack's middleware followed by `additional`.
    #[must_use]
    pub fn with(&self, additional: impl IntoIterator<Item = SharedMiddleware>) -> Self {
        let mut middleware = self.middleware.clone();
        middleware.extend(additional);
        Self { middleware }
    }

    /// Effective middleware, outermost first.
    #[must_use]
    pub fn middleware(&self) -> &[SharedMiddleware] {
        &self.middleware
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Wrap `handler` so that `middleware[0]` is the outermost layer.
    #[must_use]
    pub fn apply(&self, handler: Handler) -> Handler {
        self.middleware
            .iter()
            .rev()
            .fold(handler, |next, middleware| middleware.wrap(next))
    }
}

impl Middleware for Stack {
    fn wrap(&self, next: Handler) -> Handler {
        self.apply(next)
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack").field("len", &self.middleware.len()).finish()
    }
}

#[cfg(test)]
#[path = "stack_test.rs"]
mod tests;
