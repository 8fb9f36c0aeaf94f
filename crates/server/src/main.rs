//! Datahub MCP server binary.
//!
//! Loads configuration from CLI/environment, builds the catalog client
//! (adopting a stored access token when it still works), and serves the MCP
//! surface over stdio or streamable HTTP.

mod config;
mod error;
mod service;
mod token_store;

use clap::Parser as _;
use config::{Cli, Settings, Transport};
use datahub_catalog::client::DatasetCatalog;
use error::{Result, ServerError};
use rmcp::ServiceExt as _;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use service::CatalogService;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    run(cli).await?;
    Ok(())
}

// Logs go to stderr: in stdio mode stdout belongs to the protocol.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_cli(&cli)?;
    let catalog = build_catalog(&settings).await?;
    let service = CatalogService::new(catalog);

    match settings.transport {
        Transport::Stdio => serve_stdio(service).await,
        Transport::StreamableHttp => serve_streamable_http(service, settings.port).await,
    }
}

/// Build the catalog client, preferring a stored access token when it still
/// works. Verification is one probe request; there is no refresh loop.
async fn build_catalog(settings: &Settings) -> Result<DatasetCatalog> {
    let basic = DatasetCatalog::new(settings.catalog_config(settings.basic_auth()))
        .map_err(|e| ServerError::Config(e.to_string()))?;

    let Some(token) = token_store::load(&settings.token_file) else {
        return Ok(basic);
    };

    let bearer = DatasetCatalog::new(
        settings.catalog_config(datahub_catalog::config::CatalogAuth::Bearer { token }),
    )
    .map_err(|e| ServerError::Config(e.to_string()))?;

    match bearer.probe().await {
        Ok(()) => {
            info!(path = %settings.token_file.display(), "using stored Datahub access token");
            Ok(bearer)
        }
        Err(e) => {
            warn!(error = %e, "stored access token rejected; falling back to basic auth");
            Ok(basic)
        }
    }
}

async fn serve_stdio(service: CatalogService) -> Result<()> {
    info!("serving MCP over stdio");
    let running = service
        .serve(stdio())
        .await
        .map_err(|e| ServerError::Startup(format!("stdio transport failed to initialize: {e}")))?;
    running
        .waiting()
        .await
        .map_err(|e| ServerError::Runtime(format!("stdio transport terminated abnormally: {e}")))?;
    Ok(())
}

async fn serve_streamable_http(service: CatalogService, port: u16) -> Result<()> {
    let mcp_service = StreamableHttpService::new(
        move || Ok(service.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let router = axum::Router::new()
        .nest_service("/mcp", mcp_service)
        .route("/health", axum::routing::get(|| async { "ok" }));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving MCP over streamable HTTP");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Runtime(format!("HTTP server terminated abnormally: {e}")))?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
    }
}
