//! Access logging middleware.
//!
//! # Responsibilities
//! - Stamp each request with its arrival instant
//! - Emit one structured entry per completed request
//!
//! # Design Decisions
//! - Outermost layer, so static, routed, rejected and upgraded requests are all logged
//! - Entries go to the `access` tracing target
//! - The entry is also attached to the response extensions for inspection

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;

use crate::http::request::X_REQUEST_ID;
use crate::observability::client_ip;

/// Arrival time of a request, inserted into request extensions.
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

/// One access log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessLogEntry {
    pub method: String,
    pub status: u16,
    pub url: String,
    pub elapsed_ms: f64,
    pub ip: String,
    pub request_id: Option<String>,
}

impl AccessLogEntry {
    pub fn new(method: &str, status: StatusCode, url: &str, elapsed: Duration, ip: String) -> Self {
        Self {
            method: method.to_string(),
            status: status.as_u16(),
            url: url.to_string(),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            ip,
            request_id: None,
        }
    }

    /// Elapsed milliseconds with two decimals.
    pub fn elapsed_display(&self) -> String {
        format!("{:.2}", self.elapsed_ms)
    }

    pub fn emit(&self) {
        tracing::info!(
            target: "access",
            method = %self.method,
            status = self.status,
            url = %self.url,
            elapsed_ms = %self.elapsed_display(),
            ip = %self.ip,
            request_id = self.request_id.as_deref().unwrap_or("-"),
            "{} {} {} {}ms {}",
            self.method,
            self.status,
            self.url,
            self.elapsed_display(),
            self.ip,
        );
    }
}

/// Middleware function recording latency and client identity.
pub async fn access_log(mut request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    request.extensions_mut().insert(RequestStart(started));

    let method = request.method().to_string();
    let url = request.uri().to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let ip = client_ip::resolve(peer, request.headers());

    let mut response = next.run(request).await;

    let mut entry = AccessLogEntry::new(&method, response.status(), &url, started.elapsed(), ip);
    entry.request_id = response
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    entry.emit();

    response.extensions_mut().insert(entry);
    response
}
