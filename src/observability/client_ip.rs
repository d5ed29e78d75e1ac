//! Client IP resolution.
//!
//! # Precedence
//! 1. Transport peer address
//! 2. `CF-Connecting-IP`
//! 3. `X-Real-IP`
//! 4. `X-Forwarded-For` (first hop)
//! 5. `"unknown"`

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Placeholder logged when no address can be found.
pub const UNKNOWN_IP: &str = "unknown";

/// Proxy headers consulted when the peer address is unavailable, in priority order.
pub const PROXY_HEADERS: [&str; 3] = ["cf-connecting-ip", "x-real-ip", "x-forwarded-for"];

/// Resolve the client IP for logging.
pub fn resolve(peer: Option<SocketAddr>, headers: &HeaderMap) -> String {
    if let Some(addr) = peer {
        return addr.ip().to_string();
    }

    PROXY_HEADERS
        .iter()
        .find_map(|name| {
            let value = headers.get(*name)?.to_str().ok()?;
            // X-Forwarded-For lists every hop; the client is first.
            let first = value.split(',').next()?.trim();
            (!first.is_empty()).then(|| first.to_string())
        })
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, value.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_peer_address_wins() {
        let peer: SocketAddr = "10.0.0.5:4431".parse().unwrap();
        let headers = headers(&[("x-real-ip", "1.1.1.1")]);
        assert_eq!(resolve(Some(peer), &headers), "10.0.0.5");
    }

    #[test]
    fn test_header_priority() {
        let all = headers(&[
            ("x-forwarded-for", "3.3.3.3"),
            ("x-real-ip", "2.2.2.2"),
            ("cf-connecting-ip", "1.1.1.1"),
        ]);
        assert_eq!(resolve(None, &all), "1.1.1.1");

        let no_cf = headers(&[("x-forwarded-for", "3.3.3.3"), ("x-real-ip", "2.2.2.2")]);
        assert_eq!(resolve(None, &no_cf), "2.2.2.2");
    }

    #[test]
    fn test_forwarded_for_only() {
        let map = headers(&[("x-forwarded-for", "1.2.3.4")]);
        assert_eq!(resolve(None, &map), "1.2.3.4");

        let chain = headers(&[("x-forwarded-for", " 9.9.9.9 , 10.0.0.1")]);
        assert_eq!(resolve(None, &chain), "9.9.9.9");
    }

    #[test]
    fn test_unknown_when_nothing_available() {
        assert_eq!(resolve(None, &HeaderMap::new()), "unknown");
        let blank = headers(&[("x-real-ip", "  ")]);
        assert_eq!(resolve(None, &blank), "unknown");
    }
}
