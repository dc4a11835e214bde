//! Booking Window - working hours and booking window validation service
//!
//! Serves the organization, working hours, booking settings and booking
//! validation API over HTTP, backed by a local SQLite database.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::{fmt::MakeWriter, Layer, Registry};

use booking_window::{
    api,
    config::{LogFormat, LogTarget, LoggingConfig},
    db, AppConfig, AppState,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn main() -> Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    // Check for --help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    // Check for --version flag
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("Booking Window {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The guard must outlive the server so buffered file logs get flushed
    let _log_guard = init_logging(&config.logging);

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers.max(1))
        .enable_all()
        .build()
        .context("Failed to build async runtime")?
        .block_on(run(config))
}

async fn run(config: AppConfig) -> Result<()> {
    info!("Booking Window starting up");
    info!(workers = config.server.workers, "Configuration loaded successfully");

    // Ensure data directory exists
    ensure_data_directory(&config)?;

    // Initialize database connection pool
    info!("Initializing database connection");
    let db = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;

    let state = AppState {
        config: config.clone(),
        db,
    };

    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address configuration")?;

    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server is ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Booking Window stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize logging based on configuration
fn init_logging(log_config: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if matches!(log_config.target, LogTarget::Console | LogTarget::Both) {
        layers.push(fmt_layer(&log_config.format, std::io::stdout));
    }
    if matches!(log_config.target, LogTarget::File | LogTarget::Both) {
        let (writer, file_guard) = create_file_writer(log_config);
        layers.push(fmt_layer(&log_config.format, writer));
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    guard
}

/// Formatting layer for one output
fn fmt_layer<W>(format: &LogFormat, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::fmt;

    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(writer)
            .boxed(),
    }
}

fn create_file_writer(
    log_config: &LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    // Logging is not up yet, so report on stderr
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Ensure the directory of the SQLite database file exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    if let Some(path) = config.database.url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).context("Failed to create data directory")?;
                info!("Created data directory: {:?}", parent);
            }
        }
    }
    Ok(())
}

/// Create the application router with all routes and middleware
fn create_router(state: AppState, config: &AppConfig) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let router = Router::new()
        .nest("/api/v1", api::routes())
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(trace_layer);

    // Only needed when the booking UI is served from another origin
    if config.server.cors_permissive {
        info!("Permissive CORS enabled");
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Print help message
fn print_help() {
    println!(
        r#"Booking Window {}

USAGE:
    booking-window [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information

ENVIRONMENT:
    BOOKING_WINDOW_CONFIG       Path to configuration file
    BOOKING_WINDOW_HOST         Listen address (overrides server.host)
    BOOKING_WINDOW_PORT         Listen port (overrides server.port)
    DATABASE_URL                SQLite URL (overrides database.url)
    RUST_LOG                    Log filter (overrides logging.level)
    BOOKING_WINDOW_LOG_FORMAT   pretty, compact or json
    BOOKING_WINDOW_LOG_TARGET   console, file or both
    BOOKING_WINDOW_LOG_DIR      Directory for log files

CONFIGURATION:
    The application looks for configuration files in the following order:
    1. Path specified by BOOKING_WINDOW_CONFIG environment variable
    2. ./config.yaml
    3. ./config/config.yaml
    4. /etc/booking-window/config.yaml
    5. <user config dir>/booking-window/config.yaml"#,
        env!("CARGO_PKG_VERSION")
    );
}
