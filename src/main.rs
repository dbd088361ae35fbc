mod app;
mod config;
mod error;
mod http;
mod render;
mod server;
mod tools;
mod widgets;
mod xkcd;

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::ComicApp;
use crate::config::{Config, Transport};
use crate::server::XkcdServer;
use crate::xkcd::XkcdClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting XKCD Widget MCP Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Configuration loaded: api_url={} transport={:?}", config.api_url, config.transport);

    let app = ComicApp::new(XkcdClient::new(&config.api_url)?);

    match config.transport {
        Transport::Stdio => serve_stdio(app).await?,
        Transport::Http => serve_http(app, &config).await?,
    }

    tracing::info!("XKCD Widget MCP Server stopped");
    Ok(())
}

async fn serve_stdio(app: std::sync::Arc<ComicApp>) -> Result<()> {
    let service = XkcdServer::new(app).serve(stdio()).await?;

    tokio::select! {
        result = service.waiting() => {
            if let Err(e) = result {
                tracing::warn!("Service ended with error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
        _ = parent_process_exited() => {
            tracing::info!("Parent process exited");
        }
    }
    Ok(())
}

async fn serve_http(app: std::sync::Arc<ComicApp>, config: &Config) -> Result<()> {
    let listener = http::bind(config.http_addr()?).await?;
    http::serve(listener, app, async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
    })
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

async fn parent_process_exited() {
    #[cfg(windows)]
    {
        use std::os::windows::io::AsRawHandle;
        use tokio::time::{interval, Duration};
        use windows_sys::Win32::Foundation::{
            GetLastError, ERROR_BROKEN_PIPE, ERROR_INVALID_HANDLE, ERROR_NO_DATA,
        };
        use windows_sys::Win32::Storage::FileSystem::{GetFileType, FILE_TYPE_PIPE};

        let stdin_handle = std::io::stdin().as_raw_handle() as *mut std::ffi::c_void;

        // Only monitor if stdin is a pipe
        let file_type = unsafe { GetFileType(stdin_handle) };
        if file_type != FILE_TYPE_PIPE {
            tracing::debug!("Stdin is not a pipe, skipping parent process monitor");
            return std::future::pending::<()>().await;
        }

        let mut check = interval(Duration::from_millis(500));
        loop {
            check.tick().await;
            let mut available: u32 = 0;
            let result = unsafe {
                windows_sys::Win32::System::Pipes::PeekNamedPipe(
                    stdin_handle,
                    std::ptr::null_mut(),
                    0,
                    std::ptr::null_mut(),
                    &mut available,
                    std::ptr::null_mut(),
                )
            };
            if result == 0 {
                let err = unsafe { GetLastError() };
                match err {
                    ERROR_BROKEN_PIPE | ERROR_NO_DATA | ERROR_INVALID_HANDLE => break,
                    _ => {}
                }
            }
        }
    }

    #[cfg(not(windows))]
    std::future::pending::<()>().await
}
