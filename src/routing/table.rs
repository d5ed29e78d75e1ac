//! Immutable route table built once at startup.
//!
//! # Responsibilities
//! - Turn route modules into normalized patterns
//! - Reject malformed or duplicate routes, naming the offending file
//! - Expose a sorted listing for the startup banner
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Registration order is kept; it breaks specificity ties
//! - Handlers are resolved up front, never looked up by path at request time

use std::fmt;
use std::sync::Arc;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::http::handler::Handler;
use crate::routing::definition::RouteDefinition;
use crate::routing::matcher::{self, MatchedRoute};
use crate::routing::pattern::{PatternError, RoutePattern};

/// Errors raised while building the route table.
#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("route module `{file}`: {source}")]
    InvalidPattern {
        file: String,
        #[source]
        source: PatternError,
    },

    #[error("route module `{file}`: pattern `{pattern}` is already served by `{existing}`")]
    Duplicate {
        file: String,
        pattern: String,
        existing: String,
    },

    #[error("route module `{file}`: invalid response content type `{value}`")]
    InvalidReturns { file: String, value: String },
}

/// A route module: its file path under the routes directory, its definition and handler.
pub struct RouteModule {
    file: String,
    definition: RouteDefinition,
    handler: Arc<dyn Handler>,
}

impl RouteModule {
    pub fn new(file: impl Into<String>, definition: RouteDefinition, handler: impl Handler) -> Self {
        Self {
            file: file.into(),
            definition,
            handler: Arc::new(handler),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }
}

/// A compiled route.
pub struct Route {
    pattern: RoutePattern,
    file: String,
    definition: RouteDefinition,
    handler: Arc<dyn Handler>,
}

impl Route {
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn definition(&self) -> &RouteDefinition {
        &self.definition
    }

    pub fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("file", &self.file)
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Ordered, immutable set of routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile route modules in registration order. Fails on the first bad module.
    pub fn build(modules: impl IntoIterator<Item = RouteModule>) -> Result<Self, RouteTableError> {
        let mut routes: Vec<Route> = Vec::new();

        for module in modules {
            let pattern = RoutePattern::from_file(&module.file).map_err(|source| {
                RouteTableError::InvalidPattern {
                    file: module.file.clone(),
                    source,
                }
            })?;

            if let Some(existing) = routes.iter().find(|r| r.pattern == pattern) {
                return Err(RouteTableError::Duplicate {
                    file: module.file,
                    pattern: pattern.to_string(),
                    existing: existing.file.clone(),
                });
            }

            if let Some(value) = module.definition.returned().media_type() {
                if HeaderValue::from_str(value).is_err() {
                    return Err(RouteTableError::InvalidReturns {
                        file: module.file,
                        value: value.to_string(),
                    });
                }
            }

            tracing::debug!(pattern = %pattern, file = %module.file, "Route registered");

            routes.push(Route {
                pattern,
                file: module.file,
                definition: module.definition,
                handler: module.handler,
            });
        }

        Ok(Self { routes })
    }

    /// Find the best route for a request path. See [`matcher::match_route`].
    pub fn find(&self, path: &str, query: Option<&str>) -> Option<MatchedRoute<'_>> {
        matcher::match_route(self, path, query)
    }

    /// Routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// `(pattern, file)` pairs sorted by pattern.
    pub fn listing(&self) -> Vec<(&str, &str)> {
        let mut listing: Vec<(&str, &str)> = self
            .routes
            .iter()
            .map(|r| (r.pattern.as_str(), r.file.as_str()))
            .collect();
        listing.sort_by(|a, b| a.0.cmp(b.0));
        listing
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
