//! Read-only admin guard.
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ─────────────────────▶│ request id → trace → timeout → admission ────┼──▶ 403 / 409
//!                           │                                   │          │
//!                           │                         /_guard/* │ forward  │
//!     Client Response       │                                   ▼          │
//!     ◀─────────────────────│◀──────────────────────────── upstream client─┼──▶ Application
//!                           └──────────────────────────────────────────────┘
//! ```
//!
//! The enforcement mode is read from `PB_READONLY_ADMIN` once, at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{Method, Uri};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use readonly_guard::config::{self, GuardConfig};
use readonly_guard::http::HttpServer;
use readonly_guard::lifecycle::{build_policy, signals, Shutdown, StartupError};
use readonly_guard::observability::{logging, metrics};
use readonly_guard::policy::Decision;

#[derive(Parser)]
#[command(name = "readonly-guard", version)]
#[command(about = "Blocks schema/config mutations in front of an API when PB_READONLY_ADMIN=true", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the guard in front of the upstream (default)
    Serve,
    /// Evaluate the policy for one request and print the decision
    Check {
        /// HTTP method, e.g. POST
        method: String,
        /// Request target, e.g. /api/collections; any query is ignored
        path: String,
    },
    /// Print the protected rule table in evaluation order
    Rules,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::Check { method, path } => check(&config, &method, &path)?,
        Commands::Rules => rules(&config)?,
    }
    Ok(())
}

async fn serve(config: GuardConfig) -> Result<(), StartupError> {
    tracing::info!("readonly-guard v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let policy = build_policy(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config, policy)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(config: &GuardConfig, method: &str, target: &str) -> Result<(), Box<dyn std::error::Error>> {
    let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
    let uri: Uri = target.parse()?;
    let path = uri.path();
    let policy = build_policy(config)?;

    let report = match policy.evaluate(&method, path) {
        Decision::Continue => serde_json::json!({
            "method": method.as_str(),
            "path": path,
            "read_only": policy.read_only().mode().is_enforced(),
            "decision": "allow",
        }),
        Decision::Terminate(denial) => serde_json::json!({
            "method": method.as_str(),
            "path": path,
            "read_only": policy.read_only().mode().is_enforced(),
            "decision": "deny",
            "status": denial.status.as_u16(),
            "surface": denial.surface.map(|s| s.as_str()),
            "body": denial,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn rules(config: &GuardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let policy = build_policy(config)?;
    for (i, rule) in policy.read_only().routes().iter().enumerate() {
        println!("{:>2}  {:<16} {}", i + 1, rule.surface().as_str(), rule.pattern());
    }
    Ok(())
}
