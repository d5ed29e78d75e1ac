//! Per-request state handed to route handlers.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, Uri};

use crate::http::body::RequestBody;
use crate::http::request::X_REQUEST_ID;
use crate::routing::{PathParams, QueryParams};

/// Everything a handler gets for one request. Never shared across requests.
#[derive(Debug)]
pub struct RequestContext {
    request: Request<Body>,
    body: RequestBody,
    query: QueryParams,
    params: PathParams,
    started_at: Instant,
}

impl RequestContext {
    pub fn new(
        request: Request<Body>,
        body: RequestBody,
        query: QueryParams,
        params: PathParams,
        started_at: Instant,
    ) -> Self {
        Self {
            request,
            body,
            query,
            params,
            started_at,
        }
    }

    /// The incoming request. Its body is empty when a body policy consumed it.
    pub fn request(&self) -> &Request<Body> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<Body> {
        &mut self.request
    }

    pub fn into_request(self) -> Request<Body> {
        self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// Decoded body, or an empty JSON object.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// When the request arrived.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time since arrival.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }
}
