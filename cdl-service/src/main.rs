//! HTTP compilation service for CDL.
//!
//! A thin network adapter over `cdl-parser`: the handlers call exactly the
//! same core functions the embeddable API exposes and serialize the same
//! types, so a client gets byte-identical results whether it compiles
//! locally or over the wire. No compiler logic lives here.

mod handlers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cdl-service")]
#[command(about = "HTTP compilation service for CDL sources")]
struct Cli {
    /// TCP address to bind
    #[arg(long, default_value = "127.0.0.1:8081")]
    bind: SocketAddr,

    /// Maximum accepted request body size in bytes
    #[arg(long, default_value_t = 400 * 1024)]
    body_limit: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

fn app(body_limit: usize, timeout: Duration) -> Router {
    Router::new()
        .route("/lex", post(handlers::lex_handler))
        .route("/parse", post(handlers::parse_handler))
        .route("/compile", post(handlers::compile_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(body_limit))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let router = app(cli.body_limit, Duration::from_secs(cli.timeout));

    info!("listening on {}", cli.bind);
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .expect("failed to bind service address");
    axum::serve(listener, router)
        .await
        .expect("server error");
}
