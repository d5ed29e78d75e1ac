//! Route handler abstraction.

use std::future::Future;
use std::pin::Pin;

use axum::response::Response;

use crate::http::context::RequestContext;

pub use axum::BoxError;

/// What a route handler produces. Errors become a generic 500.
pub type HandlerResult = Result<Response, BoxError>;

/// Boxed future returned by [`Handler::call`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// A route handler, resolved once when the route table is built.
///
/// Implemented for any `async fn(RequestContext) -> HandlerResult`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: RequestContext) -> HandlerFuture {
        Box::pin(self(ctx))
    }
}
