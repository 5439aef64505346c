//! Shared helpers for byte-api integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use byte_api::{build_router, AppState, InMemoryGuildRepository};
use byte_common::testing::RecordingSleeper;
use byte_infra::observability::metrics::ApiMetrics;
use byte_infra::{ByteApiClient, HttpClient};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Router state with handles on its parts for assertions.
pub struct TestApp {
    pub state: AppState,
    pub metrics: Arc<ApiMetrics>,
    pub guilds: Arc<InMemoryGuildRepository>,
}

pub fn test_app() -> TestApp {
    let metrics = Arc::new(ApiMetrics::new().expect("metrics registry"));
    let guilds = Arc::new(InMemoryGuildRepository::new());
    let state = AppState::new(Arc::clone(&metrics), guilds.clone());
    TestApp { state, metrics, guilds }
}

/// A live server on an ephemeral port; `stop` shuts it down gracefully.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub metrics: Arc<ApiMetrics>,
    pub guilds: Arc<InMemoryGuildRepository>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl RunningServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client with instant backoff sleeps pointed at this server.
    pub fn client(&self) -> (ByteApiClient, RecordingSleeper) {
        let sleeper = RecordingSleeper::new();
        let http = HttpClient::builder()
            .base_url(self.base_url())
            .sleeper(Arc::new(sleeper.clone()))
            .build()
            .expect("client builds");
        (ByteApiClient::new(http), sleeper)
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.expect("server task");
    }
}

pub async fn spawn_server() -> RunningServer {
    let app = test_app();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel::<()>();

    let router = build_router(app.state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = rx.await;
            })
            .await
            .expect("server runs");
    });

    RunningServer { addr, metrics: app.metrics, guilds: app.guilds, shutdown: Some(tx), handle }
}
