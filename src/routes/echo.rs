//! `POST /echo`: returns the decoded JSON body.

use axum::http::Method;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::http::{HandlerResult, RequestContext};
use crate::routing::{Accepts, BodyPolicy, RouteDefinition};

pub fn route_def() -> RouteDefinition {
    RouteDefinition::new(Method::POST)
        .accepts(Accepts::only(["application/json"]))
        .returns("application/json")
        .body(BodyPolicy::Json)
}

pub async fn handler(ctx: RequestContext) -> HandlerResult {
    let body = ctx.body().as_json().cloned().unwrap_or_else(|| json!({}));
    Ok(Json(json!({ "body": body })).into_response())
}
