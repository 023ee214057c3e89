//! Timewarrior MCP Server
//!
//! Exposes `timew` start/stop/summary/tags as MCP tools over stdio or HTTP.

mod config;
mod mcp;
mod operations;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use rmcp::ServiceExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{ServerConfig, Transport};
use mcp::{create_mcp_router, TimewMcpServer, TOOL_NAMES};
use timew_exec::{CommandRunner, DEFAULT_SHELL, DEFAULT_TIMEW_BIN};

/// MCP server exposing Timewarrior as tools.
#[derive(Parser, Debug)]
#[command(name = "timewarrior-mcp-server", version, about = "MCP server for Timewarrior time tracking")]
struct Args {
    /// Timewarrior executable (name on PATH or full path)
    #[arg(long, env = "TIMEW_BIN", default_value = DEFAULT_TIMEW_BIN)]
    timew_bin: String,

    /// POSIX shell used to run timew command lines
    #[arg(long, env = "TIMEW_MCP_SHELL", default_value = DEFAULT_SHELL)]
    shell: String,

    /// Transport to serve MCP on
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// HTTP bind address (with --transport http)
    #[arg(long, default_value = "127.0.0.1:8765")]
    http_addr: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            timew_bin: args.timew_bin,
            shell: args.shell,
            transport: args.transport,
            http_addr: args.http_addr,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging (to stderr, stdout carries the stdio transport)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = ServerConfig::from(args);
    let runner: Arc<dyn CommandRunner> = Arc::new(config.runner());

    info!(
        timew_bin = %config.timew_bin,
        shell = %config.shell,
        transport = %config.transport,
        "Timewarrior MCP server starting"
    );
    for name in TOOL_NAMES {
        info!(tool = name, "Registered tool");
    }

    match config.transport {
        Transport::Stdio => serve_stdio(runner).await?,
        Transport::Http => serve_http(runner, &config.http_addr).await?,
    }

    info!("Timewarrior MCP server stopped");
    Ok(())
}

async fn serve_stdio(runner: Arc<dyn CommandRunner>) -> Result<(), Box<dyn std::error::Error>> {
    let service = TimewMcpServer::new(runner)
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to initialize MCP session");
            e
        })?;

    info!("Timewarrior MCP server running on stdio");
    let reason = service.waiting().await?;
    info!(reason = ?reason, "MCP session ended");
    Ok(())
}

async fn serve_http(
    runner: Arc<dyn CommandRunner>,
    http_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = http_addr.parse()?;
    let ct = CancellationToken::new();
    let router = create_mcp_router(runner, ct.clone());

    let listener = TcpListener::bind(addr).await?;
    info!("MCP HTTP server listening on http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            ct.cancel();
        })
        .await?;
    Ok(())
}
