//! Route definitions declared by route modules.
//!
//! # Responsibilities
//! - Declare accepted method(s) for a route
//! - Declare accepted request content types (or wildcard)
//! - Declare the response content type forced after the handler runs
//! - Declare how the request body is decoded before invocation
//!
//! # Design Decisions
//! - Definitions are plain values, frozen once moved into the route table
//! - Method matching is exact and case-sensitive
//! - Media type comparison ignores ASCII case

use std::fmt;

use axum::http::Method;

/// Wildcard media type accepted by [`Accepts::Any`] and [`Returns::Any`].
pub const ANY_MEDIA_TYPE: &str = "*/*";

/// One or more HTTP methods a route answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSet(Vec<Method>);

impl MethodSet {
    /// A route answering a single method.
    pub fn one(method: Method) -> Self {
        Self(vec![method])
    }

    /// A route answering several methods. Duplicates are collapsed.
    pub fn many(methods: impl IntoIterator<Item = Method>) -> Self {
        let mut set: Vec<Method> = Vec::new();
        for method in methods {
            if !set.contains(&method) {
                set.push(method);
            }
        }
        Self(set)
    }

    /// Returns true if the request method is declared.
    pub fn contains(&self, method: &Method) -> bool {
        self.0.iter().any(|m| m == method)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        Self::one(method)
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, method) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", method)?;
        }
        Ok(())
    }
}

/// Request content types a route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accepts {
    /// `*/*`: any content type, including none at all.
    Any,
    /// Only the listed media types. A request without a content type never matches.
    Only(Vec<String>),
}

impl Accepts {
    pub fn only(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Only(types.into_iter().map(Into::into).collect())
    }

    /// Check the request's media type (parameters already stripped).
    pub fn matches(&self, media_type: Option<&str>) -> bool {
        match self {
            Accepts::Any => true,
            Accepts::Only(types) => media_type
                .map(|received| types.iter().any(|t| t.eq_ignore_ascii_case(received)))
                .unwrap_or(false),
        }
    }
}

impl From<&str> for Accepts {
    fn from(value: &str) -> Self {
        if value == ANY_MEDIA_TYPE {
            Accepts::Any
        } else {
            Accepts::Only(vec![value.to_string()])
        }
    }
}

impl fmt::Display for Accepts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accepts::Any => write!(f, "{}", ANY_MEDIA_TYPE),
            Accepts::Only(types) => write!(f, "{}", types.join(", ")),
        }
    }
}

/// Response content type declared by a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Returns {
    /// Leave whatever the handler set.
    Any,
    /// Force this content type onto every response.
    Type(String),
}

impl Returns {
    pub fn json() -> Self {
        Returns::Type("application/json".to_string())
    }

    pub fn media_type(&self) -> Option<&str> {
        match self {
            Returns::Any => None,
            Returns::Type(t) => Some(t),
        }
    }
}

impl From<&str> for Returns {
    fn from(value: &str) -> Self {
        if value == ANY_MEDIA_TYPE {
            Returns::Any
        } else {
            Returns::Type(value.to_string())
        }
    }
}

/// How the request body is decoded before the handler runs.
///
/// Only `Json` and `Multipart` decode anything. The remaining variants are
/// accepted declarations that leave the body stream untouched for the handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyPolicy {
    #[default]
    None,
    Json,
    Multipart,
    UrlEncoded,
    Text,
    Raw,
    Blob,
}

impl BodyPolicy {
    /// The request media type that triggers decoding under this policy.
    pub fn media_type(&self) -> Option<&'static str> {
        match self {
            BodyPolicy::Json => Some("application/json"),
            BodyPolicy::Multipart => Some("multipart/form-data"),
            _ => None,
        }
    }
}

/// The contract a route module declares next to its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    method: MethodSet,
    accepts: Accepts,
    returns: Returns,
    body: BodyPolicy,
}

impl RouteDefinition {
    /// Start a definition for the given method(s). Accepts and returns default to `*/*`.
    pub fn new(method: impl Into<MethodSet>) -> Self {
        Self {
            method: method.into(),
            accepts: Accepts::Any,
            returns: Returns::Any,
            body: BodyPolicy::None,
        }
    }

    pub fn accepts(mut self, accepts: impl Into<Accepts>) -> Self {
        self.accepts = accepts.into();
        self
    }

    pub fn returns(mut self, returns: impl Into<Returns>) -> Self {
        self.returns = returns.into();
        self
    }

    pub fn body(mut self, policy: BodyPolicy) -> Self {
        self.body = policy;
        self
    }

    pub fn method(&self) -> &MethodSet {
        &self.method
    }

    pub fn accepted(&self) -> &Accepts {
        &self.accepts
    }

    pub fn returned(&self) -> &Returns {
        &self.returns
    }

    pub fn body_policy(&self) -> BodyPolicy {
        self.body
    }
}
