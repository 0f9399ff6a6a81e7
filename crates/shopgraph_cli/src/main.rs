//! `shopgraph` command line entry point.
//!
//! - `shopgraph serve` opens the catalog database and serves GraphQL.
//! - `shopgraph version` prints the core crate version.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use shopgraph_api::{run_server, ServerConfig};
use shopgraph_core::{core_version, default_log_level, init_logging, Store};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "shopgraph", about = "GraphQL catalog of users, products and categories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the GraphQL endpoint
    Serve(ServeArgs),
    /// Print the core crate version
    Version,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long, env = "SHOPGRAPH_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the HTTP server to
    #[arg(long, env = "SHOPGRAPH_PORT", default_value_t = 8080)]
    port: u16,

    /// SQLite database file
    #[arg(long, env = "SHOPGRAPH_DB_PATH", default_value = "shopgraph.sqlite3")]
    db_path: PathBuf,

    /// Keep the catalog in memory instead of on disk
    #[arg(long)]
    in_memory: bool,

    /// trace, debug, info, warn or error
    #[arg(long, env = "SHOPGRAPH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; defaults to ./logs
    #[arg(long, env = "SHOPGRAPH_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Version => {
            println!("shopgraph {}", core_version());
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("could not determine working directory")?;
    let log_dir = cwd.join(args.log_dir.unwrap_or_else(|| PathBuf::from("logs")));
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;

    let store = if args.in_memory {
        info!("event=store_open module=cli status=ok mode=memory");
        Store::open_in_memory().context("failed to open in-memory catalog")?
    } else {
        info!(
            "event=store_open module=cli status=ok mode=file path={}",
            args.db_path.display()
        );
        Store::open(&args.db_path)
            .with_context(|| format!("failed to open catalog at {}", args.db_path.display()))?
    };

    let config = ServerConfig {
        bind: args.bind,
        port: args.port,
    };
    run_server(config, Arc::new(store))
        .await
        .context("server terminated with an error")
}
