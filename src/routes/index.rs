//! `GET /`: reports request latency and echoes the resolved parameters.

use axum::http::Method;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::http::{HandlerResult, RequestContext};
use crate::routing::RouteDefinition;

pub fn route_def() -> RouteDefinition {
    RouteDefinition::new(Method::GET)
        .accepts("*/*")
        .returns("application/json")
}

pub async fn handler(ctx: RequestContext) -> HandlerResult {
    let perf = ctx.elapsed().as_millis() as u64;

    Ok(Json(json!({
        "perf": perf,
        "query": ctx.query(),
        "params": ctx.params(),
    }))
    .into_response())
}
