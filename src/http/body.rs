//! Request body decoding.
//!
//! # Responsibilities
//! - Decode JSON and multipart bodies for routes that ask for it
//! - Fall back to an empty JSON object when decoding fails
//!
//! # Design Decisions
//! - Decoding only happens when the route policy and the request media type agree
//! - Decode failures are logged at debug level and never reach the client
//! - Bodies are read up to the configured limit; larger bodies count as failures

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, HeaderMap, HeaderValue, Request};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::routing::BodyPolicy;

/// Why a body could not be decoded. Always recovered locally.
#[derive(Debug, Error)]
pub enum BodyDecodeError {
    #[error("failed to read body: {0}")]
    Read(#[source] axum::Error),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid multipart body: {0}")]
    Multipart(String),
}

/// A decoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(FormData),
}

impl Default for RequestBody {
    fn default() -> Self {
        RequestBody::Json(Value::Object(Map::new()))
    }
}

impl RequestBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            RequestBody::Multipart(_) => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            RequestBody::Multipart(form) => Some(form),
            RequestBody::Json(_) => None,
        }
    }

    /// True for the empty-object fallback.
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Json(Value::Object(map)) if map.is_empty())
    }
}

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FormField {
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Multipart form fields in the order they were sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<FormField>,
}

impl FormData {
    /// First field with the given name.
    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FormField::text)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The request media type: the content type before any `;` parameters, trimmed.
pub fn media_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_string())
        .filter(|ct| !ct.is_empty())
}

/// Decode the body of `request` according to `policy`.
///
/// Returns the request (with an empty body if it was consumed) and the decoded body.
pub async fn decode(
    policy: BodyPolicy,
    media_type: Option<&str>,
    request: Request<Body>,
    limit: usize,
) -> (Request<Body>, RequestBody) {
    let wanted = match policy.media_type() {
        Some(wanted) => wanted,
        None => return (request, RequestBody::default()),
    };
    if !media_type.is_some_and(|mt| mt.eq_ignore_ascii_case(wanted)) {
        return (request, RequestBody::default());
    }

    let (parts, body) = request.into_parts();
    let content_type = parts.headers.get(header::CONTENT_TYPE).cloned();

    let decoded = match policy {
        BodyPolicy::Json => decode_json(body, limit).await,
        BodyPolicy::Multipart => decode_multipart(content_type, body, limit).await,
        _ => Ok(RequestBody::default()),
    };

    let decoded = decoded.unwrap_or_else(|err| {
        tracing::debug!(error = %err, "Body decode failed, using empty body");
        RequestBody::default()
    });

    (Request::from_parts(parts, Body::empty()), decoded)
}

async fn read_limited(body: Body, limit: usize) -> Result<Bytes, BodyDecodeError> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(BodyDecodeError::Read)
}

async fn decode_json(body: Body, limit: usize) -> Result<RequestBody, BodyDecodeError> {
    let bytes = read_limited(body, limit).await?;
    let value: Value = serde_json::from_slice(&bytes)?;
    Ok(RequestBody::Json(value))
}

async fn decode_multipart(
    content_type: Option<HeaderValue>,
    body: Body,
    limit: usize,
) -> Result<RequestBody, BodyDecodeError> {
    let bytes = read_limited(body, limit).await?;

    // Re-wrap the buffered bytes; only the boundary parameter is needed.
    let mut builder = Request::builder();
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder
        .body(Body::from(bytes))
        .map_err(|e| BodyDecodeError::Multipart(e.to_string()))?;

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| BodyDecodeError::Multipart(e.body_text()))?;

    let mut form = FormData::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BodyDecodeError::Multipart(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| BodyDecodeError::Multipart(e.body_text()))?;
        form.fields.push(FormField {
            name,
            file_name,
            content_type,
            data,
        });
    }

    Ok(RequestBody::Multipart(form))
}
