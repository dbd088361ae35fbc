use crate::app::ComicApp;
use crate::error::Result;
use crate::server::XkcdServer;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::tower::{StreamableHttpServerConfig, StreamableHttpService};
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

const SERVICE_NAME: &str = "XKCD ChatGPT App";

pub fn router(app: Arc<ComicApp>) -> Router {
    let mcp_app = app.clone();
    let mcp = StreamableHttpService::new(
        move || Ok(XkcdServer::new(mcp_app.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(app)
        .nest_service("/mcp", mcp)
        .layer(cors)
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    Ok(TcpListener::bind(addr).await?)
}

pub async fn serve(
    listener: TcpListener,
    app: Arc<ComicApp>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    tracing::info!("Listening on http://{} (MCP endpoint at /mcp)", listener.local_addr()?);
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn root(State(app): State<Arc<ComicApp>>) -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "widgets": app.registry().count(),
        "endpoints": {
            "mcp": "/mcp",
            "health": "/health",
        },
        "description": "MCP server for fetching and displaying XKCD comics",
        "auth_required": false,
    }))
}

async fn health(State(app): State<Arc<ComicApp>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "auth_required": false,
        "widgets_count": app.registry().count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComicError;
    use crate::xkcd::XkcdClient;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(path: &str) -> (StatusCode, Value) {
        let app = ComicApp::new(XkcdClient::new("http://127.0.0.1:9").unwrap());
        let resp = router(app)
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_root_describes_service() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], SERVICE_NAME);
        assert_eq!(body["status"], "running");
        assert_eq!(body["widgets"], 1);
        assert_eq!(body["endpoints"]["mcp"], "/mcp");
    }

    #[tokio::test]
    async fn test_bind_reports_io_error_when_address_is_taken() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let err = bind(addr).await.unwrap_err();
        assert!(matches!(err, ComicError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "auth_required": false, "widgets_count": 1}));
    }
}
