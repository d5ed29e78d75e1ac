//! Route patterns derived from route module file paths.
//!
//! # Conventions
//! ```text
//! index.rs                  → /
//! users/index.rs            → /users
//! users/[id].rs             → /users/[id]
//! docs/[...slug].rs         → /docs/[...slug]     (one or more segments)
//! shop/[[...path]].rs       → /shop/[[...path]]   (zero or more segments)
//! ```
//!
//! # Design Decisions
//! - The file extension is dropped, whatever it is
//! - Catch-all segments must be last
//! - Parameter names are unique within one pattern

use std::fmt;

use thiserror::Error;

/// Errors raised while turning a file path into a pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("invalid segment `{0}`")]
    InvalidSegment(String),

    #[error("empty parameter name in segment `{0}`")]
    EmptyParam(String),

    #[error("catch-all segment `{0}` must be the last segment")]
    CatchAllNotLast(String),

    #[error("parameter `{0}` declared more than once")]
    DuplicateParam(String),
}

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
    OptionalCatchAll(String),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PatternError> {
        let segment = if let Some(inner) = raw.strip_prefix("[[...").and_then(|s| s.strip_suffix("]]")) {
            Segment::OptionalCatchAll(param_name(raw, inner)?)
        } else if let Some(inner) = raw.strip_prefix("[...").and_then(|s| s.strip_suffix(']')) {
            Segment::CatchAll(param_name(raw, inner)?)
        } else if let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Segment::Param(param_name(raw, inner)?)
        } else if raw.contains(['[', ']']) {
            return Err(PatternError::InvalidSegment(raw.to_string()));
        } else {
            Segment::Static(raw.to_string())
        };
        Ok(segment)
    }

    fn param(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param(name) | Segment::CatchAll(name) | Segment::OptionalCatchAll(name) => {
                Some(name)
            }
        }
    }

    /// Lower is more specific.
    fn weight(&self) -> u8 {
        match self {
            Segment::Static(_) => 0,
            Segment::Param(_) => 1,
            Segment::CatchAll(_) => 2,
            Segment::OptionalCatchAll(_) => 3,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => write!(f, "{}", s),
            Segment::Param(name) => write!(f, "[{}]", name),
            Segment::CatchAll(name) => write!(f, "[...{}]", name),
            Segment::OptionalCatchAll(name) => write!(f, "[[...{}]]", name),
        }
    }
}

fn param_name(raw: &str, inner: &str) -> Result<String, PatternError> {
    if inner.is_empty() {
        return Err(PatternError::EmptyParam(raw.to_string()));
    }
    if !inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(PatternError::InvalidSegment(raw.to_string()));
    }
    Ok(inner.to_string())
}

/// A normalized URL pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
    normalized: String,
}

impl RoutePattern {
    /// Build a pattern from a module path relative to the routes directory.
    pub fn from_file(file: &str) -> Result<Self, PatternError> {
        let file = file.replace('\\', "/");
        let mut parts: Vec<&str> = file.split('/').filter(|p| !p.is_empty()).collect();

        if let Some(last) = parts.pop() {
            let stem = last.rsplit_once('.').map(|(stem, _ext)| stem).unwrap_or(last);
            if stem != "index" {
                parts.push(stem);
            }
        }

        let mut segments = Vec::with_capacity(parts.len());
        for (i, raw) in parts.iter().enumerate() {
            let segment = Segment::parse(raw)?;
            let is_catch_all = matches!(segment, Segment::CatchAll(_) | Segment::OptionalCatchAll(_));
            if is_catch_all && i + 1 != parts.len() {
                return Err(PatternError::CatchAllNotLast(raw.to_string()));
            }
            if let Some(name) = segment.param() {
                if segments.iter().any(|s: &Segment| s.param() == Some(name)) {
                    return Err(PatternError::DuplicateParam(name.to_string()));
                }
            }
            segments.push(segment);
        }

        let normalized = format!(
            "/{}",
            segments.iter().map(ToString::to_string).collect::<Vec<_>>().join("/")
        );

        Ok(Self { segments, normalized })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Specificity key. Compared lexicographically, lower wins.
    pub(crate) fn rank(&self) -> Vec<u8> {
        self.segments.iter().map(Segment::weight).collect()
    }

    /// Match decoded path segments, returning bound parameters in pattern order.
    pub(crate) fn match_segments(&self, path: &[String]) -> Option<Vec<(String, String)>> {
        let mut params = Vec::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(expected) => {
                    if path.get(i) != Some(expected) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = path.get(i)?;
                    params.push((name.clone(), value.clone()));
                }
                Segment::CatchAll(name) => {
                    if i >= path.len() {
                        return None;
                    }
                    params.push((name.clone(), path[i..].join("/")));
                    return Some(params);
                }
                Segment::OptionalCatchAll(name) => {
                    if i < path.len() {
                        params.push((name.clone(), path[i..].join("/")));
                    }
                    return Some(params);
                }
            }
        }

        (path.len() == self.segments.len()).then_some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_index_files() {
        assert_eq!(RoutePattern::from_file("index.rs").unwrap().as_str(), "/");
        assert_eq!(RoutePattern::from_file("users/index.rs").unwrap().as_str(), "/users");
        assert_eq!(RoutePattern::from_file("/users/list.ts").unwrap().as_str(), "/users/list");
    }

    #[test]
    fn test_dynamic_segments() {
        let pattern = RoutePattern::from_file("users/[id]/posts/[post].rs").unwrap();
        assert_eq!(pattern.as_str(), "/users/[id]/posts/[post]");
        assert_eq!(
            pattern.match_segments(&segs(&["users", "7", "posts", "hello"])),
            Some(vec![("id".into(), "7".into()), ("post".into(), "hello".into())])
        );
        assert_eq!(pattern.match_segments(&segs(&["users", "7", "posts"])), None);
    }

    #[test]
    fn test_catch_all() {
        let pattern = RoutePattern::from_file("docs/[...slug].rs").unwrap();
        assert_eq!(
            pattern.match_segments(&segs(&["docs", "a", "b"])),
            Some(vec![("slug".into(), "a/b".into())])
        );
        assert_eq!(pattern.match_segments(&segs(&["docs"])), None);

        let optional = RoutePattern::from_file("shop/[[...path]].rs").unwrap();
        assert_eq!(optional.match_segments(&segs(&["shop"])), Some(vec![]));
        assert_eq!(
            optional.match_segments(&segs(&["shop", "x"])),
            Some(vec![("path".into(), "x".into())])
        );
    }

    #[test]
    fn test_rejects_bad_files() {
        assert_eq!(
            RoutePattern::from_file("users/[id.rs"),
            Err(PatternError::InvalidSegment("[id".into()))
        );
        assert_eq!(
            RoutePattern::from_file("users/[].rs"),
            Err(PatternError::EmptyParam("[]".into()))
        );
        assert_eq!(
            RoutePattern::from_file("[...all]/tail.rs"),
            Err(PatternError::CatchAllNotLast("[...all]".into()))
        );
        assert_eq!(
            RoutePattern::from_file("[id]/[id].rs"),
            Err(PatternError::DuplicateParam("id".into()))
        );
    }

    #[test]
    fn test_rank_prefers_static() {
        let static_route = RoutePattern::from_file("users/me.rs").unwrap();
        let dynamic_route = RoutePattern::from_file("users/[id].rs").unwrap();
        assert!(static_route.rank() < dynamic_route.rank());
    }
}
