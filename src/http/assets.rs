//! Static asset serving.
//!
//! # Responsibilities
//! - Serve files under the public directory for the public URL prefix
//! - Serve the favicon from a fixed location
//! - Infer content types from file extensions
//!
//! # Design Decisions
//! - Paths are percent-decoded, then any non-normal component is rejected
//! - The resolved file is canonicalized and must stay under the canonical root
//! - Rejected and missing paths both answer 404 in plain text
//! - Any other filesystem failure answers 500 in plain text
//! - Asset responses are never JSON-negotiated

use std::io;
use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::config::PathsConfig;

/// Reasons an asset could not be served.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path escapes public root: {0}")]
    OutsideRoot(String),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file ready to be sent.
#[derive(Debug)]
pub struct Asset {
    body: Body,
    content_type: HeaderValue,
    length: u64,
}

/// Serves files from the public directory.
#[derive(Debug, Clone)]
pub struct AssetServer {
    root: PathBuf,
    prefix: String,
    favicon_path: String,
    favicon_file: PathBuf,
}

impl AssetServer {
    pub fn new(paths: &PathsConfig) -> Self {
        Self {
            root: PathBuf::from(&paths.public_dir),
            prefix: paths.public_prefix.trim_end_matches('/').to_string(),
            favicon_path: paths.favicon_path.clone(),
            favicon_file: PathBuf::from(&paths.favicon_file),
        }
    }

    /// True if this path belongs to the static surface.
    pub fn handles(&self, path: &str) -> bool {
        path == self.favicon_path
            || path == self.prefix
            || path
                .strip_prefix(&self.prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Serve `pathname`. Never fails: errors become plain-text responses.
    pub async fn serve(&self, method: &Method, pathname: &str) -> Response {
        if method != Method::GET && method != Method::HEAD {
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET, HEAD")],
                "Method Not Allowed",
            )
                .into_response();
        }

        let result = if method == Method::HEAD {
            self.head(pathname).await
        } else {
            self.load(pathname).await
        };
        asset_response(pathname, result)
    }

    async fn load(&self, pathname: &str) -> Result<Asset, AssetError> {
        let path = self.resolve(pathname).await?;
        let contents = tokio::fs::read(&path)
            .await
            .map_err(|source| AssetError::Read {
                path: path.clone(),
                source,
            })?;

        Ok(Asset {
            length: contents.len() as u64,
            content_type: content_type(&path),
            body: Body::from(contents),
        })
    }

    /// Headers only: the file is stat'ed, not read.
    async fn head(&self, pathname: &str) -> Result<Asset, AssetError> {
        let path = self.resolve(pathname).await?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| AssetError::Read {
                path: path.clone(),
                source,
            })?;

        Ok(Asset {
            length: metadata.len(),
            content_type: content_type(&path),
            body: Body::empty(),
        })
    }

    /// Map a URL path to a file inside the public root.
    pub async fn resolve(&self, pathname: &str) -> Result<PathBuf, AssetError> {
        let relative = if pathname == self.favicon_path {
            self.favicon_file.clone()
        } else {
            let rest = pathname.strip_prefix(&self.prefix).unwrap_or(pathname);
            let decoded = percent_decode_str(rest.trim_start_matches('/'))
                .decode_utf8()
                .map_err(|_| AssetError::OutsideRoot(pathname.to_string()))?;
            if decoded.contains('\0') {
                return Err(AssetError::OutsideRoot(pathname.to_string()));
            }
            PathBuf::from(decoded.as_ref())
        };

        let relative = contained(&relative)
            .ok_or_else(|| AssetError::OutsideRoot(pathname.to_string()))?;
        let candidate = self.root.join(&relative);

        let root = canonical(&self.root).await?;
        let resolved = canonical(&candidate).await?;
        if !resolved.starts_with(&root) {
            return Err(AssetError::OutsideRoot(pathname.to_string()));
        }

        let metadata = tokio::fs::metadata(&resolved)
            .await
            .map_err(|source| classify(&resolved, source))?;
        if !metadata.is_file() {
            return Err(AssetError::NotFound(resolved));
        }
        Ok(resolved)
    }
}

/// Turn the outcome of a lookup into the response sent to the client.
pub fn asset_response(pathname: &str, result: Result<Asset, AssetError>) -> Response {
    match result {
        Ok(asset) => {
            let mut response = Response::new(asset.body);
            let headers = response.headers_mut();
            headers.insert(header::CONTENT_TYPE, asset.content_type);
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(asset.length));
            response
        }
        Err(err @ (AssetError::NotFound(_) | AssetError::OutsideRoot(_))) => {
            tracing::warn!(path = %pathname, error = %err, "Static file not found");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(err) => {
            tracing::error!(path = %pathname, error = ?err, "Error serving static file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn content_type(path: &Path) -> HeaderValue {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

/// Keep only normal components. `None` if the path tries to leave its base.
fn contained(path: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

// ENOTDIR: a path component is a regular file.
#[cfg(unix)]
const NOT_A_DIRECTORY: i32 = 20;

/// Missing paths are `NotFound`; any other failure is a read error.
fn classify(path: &Path, source: io::Error) -> AssetError {
    #[cfg(unix)]
    let not_a_directory = source.raw_os_error() == Some(NOT_A_DIRECTORY);
    #[cfg(not(unix))]
    let not_a_directory = false;

    if source.kind() == io::ErrorKind::NotFound || not_a_directory {
        AssetError::NotFound(path.to_path_buf())
    } else {
        AssetError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}

async fn canonical(path: &Path) -> Result<PathBuf, AssetError> {
    tokio::fs::canonicalize(path)
        .await
        .map_err(|source| classify(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn server(root: &Path) -> AssetServer {
        AssetServer::new(&PathsConfig {
            public_dir: root.to_string_lossy().into_owned(),
            ..PathsConfig::default()
        })
    }

    fn public_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("css/site.css"), "body{}").unwrap();
        fs::write(dir.path().join("assets/favicon.ico"), [0u8, 1, 2]).unwrap();
        fs::write(dir.path().join("data.unknownext"), "??").unwrap();
        dir
    }

    #[test]
    fn test_handles_prefix_by_segment() {
        let server = server(Path::new("public"));
        assert!(server.handles("/public/css/site.css"));
        assert!(server.handles("/public"));
        assert!(server.handles("/favicon.ico"));
        assert!(!server.handles("/publicity"));
        assert!(!server.handles("/api/public"));
    }

    #[test]
    fn test_contained_rejects_parent() {
        assert_eq!(contained(Path::new("css/./a.css")), Some(PathBuf::from("css/a.css")));
        assert_eq!(contained(Path::new("../secret")), None);
        assert_eq!(contained(Path::new("css/../../secret")), None);
        assert_eq!(contained(Path::new("/etc/passwd")), None);
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let dir = public_root();
        let response = server(dir.path()).serve(&Method::GET, "/public/css/site.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"body{}");
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let dir = public_root();
        let response = server(dir.path()).serve(&Method::GET, "/public/data.unknownext").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
    }

    #[tokio::test]
    async fn test_favicon_from_fixed_location() {
        let dir = public_root();
        let response = server(dir.path()).serve(&Method::GET, "/favicon.ico").await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], &[0u8, 1, 2]);
    }

    #[tokio::test]
    async fn test_missing_file_is_plain_404() {
        let dir = public_root();
        let response = server(dir.path()).serve(&Method::GET, "/public/nope.js").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"Not Found");
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let dir = public_root();
        let outside = dir.path().parent().unwrap().join("outside-secret.txt");
        fs::write(&outside, "secret").ok();

        let server = server(dir.path());
        for path in [
            "/public/../outside-secret.txt",
            "/public/%2e%2e/outside-secret.txt",
            "/public/css/..%2F..%2Foutside-secret.txt",
        ] {
            let response = server.serve(&Method::GET, path).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        }

        fs::remove_file(&outside).ok();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_is_rejected() {
        let dir = public_root();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let response = server(dir.path()).serve(&Method::GET, "/public/link/secret.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_directory_is_not_served() {
        let dir = public_root();
        let response = server(dir.path()).serve(&Method::GET, "/public/css").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_and_other_methods() {
        let dir = public_root();
        let server = server(dir.path());

        let response = server.serve(&Method::HEAD, "/public/css/site.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(bytes.is_empty());

        let response = server.serve(&Method::POST, "/public/css/site.css").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_head_sets_length_without_body() {
        let dir = public_root();
        let response = server(dir.path()).serve(&Method::HEAD, "/favicon.ico").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "3");
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(bytes.is_empty());

        let response = server(dir.path()).serve(&Method::GET, "/public/css/site.css").await;
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "6");
    }

    #[tokio::test]
    async fn test_read_error_is_plain_500() {
        let err = AssetError::Read {
            path: PathBuf::from("public/locked.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let response = asset_response("/public/locked.txt", Err(err));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"Internal Server Error");
    }

    #[test]
    fn test_only_missing_paths_are_not_found() {
        let path = Path::new("public/a.txt");
        let missing = classify(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(missing, AssetError::NotFound(_)));

        let denied = classify(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, AssetError::Read { .. }));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_filesystem_errors_are_500() {
        let dir = public_root();
        let server = server(dir.path());

        // Longer than NAME_MAX.
        let long_name = format!("/public/{}", "a".repeat(300));
        let response = server.serve(&Method::GET, &long_name).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // A file used as a directory is still just missing.
        let response = server.serve(&Method::GET, "/public/css/site.css/extra").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = server.serve(&Method::GET, "/public/nul%00byte").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
