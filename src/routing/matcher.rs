//! Route matching logic.
//!
//! # Responsibilities
//! - Split and percent-decode the request path
//! - Pick the most specific route for the path
//! - Bind path parameters and parse the query string
//!
//! # Design Decisions
//! - Static segments beat dynamic ones at the same depth
//! - Among equally specific routes the first registered wins
//! - The query string never takes part in route selection
//! - Pure function over the immutable table

use percent_encoding::percent_decode_str;

use crate::routing::params::{parse_query, PathParams, QueryParams};
use crate::routing::table::{Route, RouteTable};

/// Result of matching a request against the route table.
#[derive(Debug)]
pub struct MatchedRoute<'a> {
    route: &'a Route,
    params: PathParams,
    query: QueryParams,
}

impl<'a> MatchedRoute<'a> {
    pub fn route(&self) -> &'a Route {
        self.route
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn into_params(self) -> (PathParams, QueryParams) {
        (self.params, self.query)
    }
}

/// Split a URL path into decoded segments. Empty segments are dropped,
/// so trailing and doubled slashes do not matter.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect()
}

/// Find the most specific route for `path`.
pub fn match_route<'a>(table: &'a RouteTable, path: &str, query: Option<&str>) -> Option<MatchedRoute<'a>> {
    let segments = split_path(path);

    let mut best: Option<(Vec<u8>, &Route, Vec<(String, String)>)> = None;
    for route in table.iter() {
        let Some(params) = route.pattern().match_segments(&segments) else {
            continue;
        };
        let rank = route.pattern().rank();
        // Strictly better only: ties keep the earlier registration.
        if best.as_ref().map_or(true, |(best_rank, _, _)| rank < *best_rank) {
            best = Some((rank, route, params));
        }
    }

    best.map(|(_, route, params)| MatchedRoute {
        route,
        params: PathParams::from(params),
        query: parse_query(query),
    })
}
