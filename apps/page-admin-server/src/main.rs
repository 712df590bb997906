//! Page admin server entry point.

use anyhow::Context;
use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    Router,
};
use clap::Parser;
use page_admin::{Capability, Config, PageAdminModule, Principal};
use sea_orm::{ConnectOptions, Database};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Header carrying the editor name, set by the authenticating proxy
const USER_HEADER: &str = "x-remote-user";
/// Comma separated capability names of the editor
const CAPABILITIES_HEADER: &str = "x-remote-capabilities";

#[derive(Debug, Parser)]
#[command(name = "page-admin-server", about = "Page admin HTTP server")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "PAGE_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Database URL; the in-memory stores are used when absent
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Apply migrations before serving
    #[arg(long)]
    migrate: bool,

    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "page_admin=info,page_admin_server=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Principal asserted by the authenticating reverse proxy
fn principal_from_headers(headers: &HeaderMap) -> Option<Principal> {
    let username = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())?;
    let capabilities = headers
        .get(CAPABILITIES_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    Some(
        capabilities
            .split(',')
            .filter_map(Capability::parse)
            .fold(Principal::new(username), Principal::with),
    )
}

async fn proxy_auth(mut request: Request, next: Next) -> Response {
    if let Some(principal) = principal_from_headers(request.headers()) {
        request.extensions_mut().insert(principal);
    }
    next.run(request).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    info!(
        languages = config.languages.len(),
        templates = config.templates.len(),
        "configuration loaded"
    );

    let module = match &args.database_url {
        Some(url) => {
            let db = Database::connect(ConnectOptions::new(url.as_str())).await?;
            info!("Connected to database");
            if args.migrate {
                PageAdminModule::migrate(&db).await?;
            }
            PageAdminModule::with_database(config, db)?
        }
        None => {
            tracing::warn!("no database configured, pages are kept in memory");
            PageAdminModule::in_memory(config)?
        }
    };

    let app = module
        .register_rest(Router::new())
        .layer(middleware::from_fn(proxy_auth))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!(addr = %args.listen, "page admin listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
