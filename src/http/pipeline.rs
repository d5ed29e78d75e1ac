//! Request pipeline for matched routes.
//!
//! # Flow
//! ```text
//! match route ──none──▶ 404
//!     │
//! decode body (json / multipart, failures → {})
//!     │
//! method check ──mismatch──▶ 405
//!     │
//! accept check ──mismatch──▶ 406
//!     │
//! invoke handler ──error/panic──▶ 500 (details logged only)
//!     │
//! force declared Content-Type
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request};
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;

use crate::http::body::{self, RequestBody};
use crate::http::context::RequestContext;
use crate::http::error::DispatchError;
use crate::observability::access_log::RequestStart;
use crate::routing::{MatchedRoute, Returns, RouteTable};

/// Dispatches requests to route handlers.
#[derive(Debug, Clone)]
pub struct Pipeline {
    routes: Arc<RouteTable>,
    max_body_bytes: usize,
}

impl Pipeline {
    pub fn new(routes: Arc<RouteTable>, max_body_bytes: usize) -> Self {
        Self {
            routes,
            max_body_bytes,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Run one request through the pipeline. Never fails: every error becomes a response.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let uri = request.uri().clone();

        let Some(matched) = self.routes.find(uri.path(), uri.query()) else {
            tracing::debug!(path = %uri.path(), "No route matched");
            return DispatchError::NotFound.into_response();
        };

        match self.invoke(matched, request).await {
            Ok(response) => response,
            Err(err) => {
                if err.status().is_server_error() {
                    tracing::error!(url = %uri, error = ?err, "Error handling route");
                } else {
                    tracing::debug!(url = %uri, error = %err, "Request rejected");
                }
                err.into_response()
            }
        }
    }

    async fn invoke(
        &self,
        matched: MatchedRoute<'_>,
        request: Request<Body>,
    ) -> Result<Response, DispatchError> {
        let route = matched.route();
        let definition = route.definition();
        let (params, query) = matched.into_params();

        let started_at = request
            .extensions()
            .get::<RequestStart>()
            .map(|start| start.0)
            .unwrap_or_else(Instant::now);

        // 1. Decode body
        let media_type = body::media_type(request.headers());
        let (request, decoded): (Request<Body>, RequestBody) = body::decode(
            definition.body_policy(),
            media_type.as_deref(),
            request,
            self.max_body_bytes,
        )
        .await;

        // 2. Method check
        if !definition.method().contains(request.method()) {
            return Err(DispatchError::MethodNotAllowed {
                received: request.method().clone(),
                expected: definition.method().clone(),
            });
        }

        // 3. Accept check
        if !definition.accepted().matches(media_type.as_deref()) {
            return Err(DispatchError::NotAcceptable {
                received: media_type.unwrap_or_else(|| "none".to_string()),
                expected: definition.accepted().clone(),
            });
        }

        // 4. Invoke
        let ctx = RequestContext::new(request, decoded, query, params, started_at);
        let handler = route.handler();
        let mut response = AssertUnwindSafe(async move { handler.call(ctx).await })
            .catch_unwind()
            .await
            .map_err(|panic| DispatchError::Panicked(panic_message(panic.as_ref())))?
            .map_err(DispatchError::Handler)?;

        // 5. Finalize headers
        if let Returns::Type(content_type) = definition.returned() {
            let value = HeaderValue::from_str(content_type)
                .map_err(|_| DispatchError::InvalidContentType(content_type.clone()))?;
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }

        Ok(response)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
