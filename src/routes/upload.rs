//! `POST /upload`: summarizes a multipart form.

use axum::http::Method;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::http::{HandlerResult, RequestContext};
use crate::routing::{Accepts, BodyPolicy, RouteDefinition};

pub fn route_def() -> RouteDefinition {
    RouteDefinition::new(Method::POST)
        .accepts(Accepts::only(["multipart/form-data"]))
        .returns("application/json")
        .body(BodyPolicy::Multipart)
}

pub async fn handler(ctx: RequestContext) -> HandlerResult {
    let fields: Vec<Value> = ctx
        .body()
        .as_form()
        .map(|form| {
            form.fields()
                .iter()
                .map(|field| {
                    json!({
                        "name": field.name,
                        "file_name": field.file_name,
                        "content_type": field.content_type,
                        "size": field.data.len(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(fields = fields.len(), "Upload received");
    Ok(Json(json!({ "fields": fields })).into_response())
}
