//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use route_dispatch::config::{PathsConfig, ServerConfig};
use route_dispatch::upgrade::UpgradeDispatcher;
use route_dispatch::{routes, HttpServer, RouteTable, Shutdown};

/// A server bound to an ephemeral port, serving a temporary public directory.
pub struct TestServer {
    pub addr: SocketAddr,
    pub public: TempDir,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    #[allow(dead_code)]
    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Stop accepting and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.handle.await;
    }
}

/// Start the server with the compiled route modules.
pub async fn start_server(upgrade: Option<UpgradeDispatcher>) -> TestServer {
    let public = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(public.path().join("assets")).unwrap();
    std::fs::write(public.path().join("assets/favicon.ico"), [0u8, 0, 1, 0]).unwrap();
    std::fs::write(public.path().join("hello.txt"), "hello from disk").unwrap();

    let config = ServerConfig {
        paths: PathsConfig {
            public_dir: public.path().to_string_lossy().into_owned(),
            ..PathsConfig::default()
        },
        ..ServerConfig::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let table = RouteTable::build(routes::discovered()).unwrap();
    let server = HttpServer::new(config, table, upgrade);

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, receiver).await.unwrap();
    });

    TestServer {
        addr,
        public,
        shutdown,
        handle,
    }
}
