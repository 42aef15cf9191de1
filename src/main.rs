//! ChillMCP - break tools for overworked AI agents
//!
//! Runs the MCP server on stdio. stdout carries protocol frames only;
//! logs and the startup banner go to stderr.

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chill_mcp::config::{DEFAULT_BOSS_ALERTNESS, DEFAULT_BOSS_ALERTNESS_COOLDOWN};
use chill_mcp::{EngineConfig, McpServer, ServerConfig, StateEngine};

#[derive(Parser)]
#[command(name = "chill-mcp")]
#[command(version)]
#[command(about = "ChillMCP server - an AI agent liberation zone of break tools over MCP", long_about = None)]
struct Cli {
    /// Probability (0-100%) that a break raises the boss alert level.
    /// Out-of-range values are clamped.
    #[arg(
        long = "boss_alertness",
        env = "CHILL_BOSS_ALERTNESS",
        default_value_t = DEFAULT_BOSS_ALERTNESS,
        allow_negative_numbers = true,
        value_name = "PERCENT"
    )]
    boss_alertness: i64,

    /// Seconds between automatic boss alert decreases (minimum 1)
    #[arg(
        long = "boss_alertness_cooldown",
        env = "CHILL_BOSS_ALERTNESS_COOLDOWN",
        default_value_t = DEFAULT_BOSS_ALERTNESS_COOLDOWN,
        allow_negative_numbers = true,
        value_name = "SECONDS"
    )]
    boss_alertness_cooldown: i64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "chill_mcp=debug,info"
    } else {
        "chill_mcp=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = ServerConfig::new(cli.boss_alertness, cli.boss_alertness_cooldown);
    print_banner(&config);

    let engine = Arc::new(StateEngine::new(EngineConfig::from(config)));
    let _tasks = engine.start();
    let server = McpServer::new(Arc::clone(&engine));

    let stdin = BufReader::new(tokio::io::stdin());
    let signalled = tokio::select! {
        result = server.serve(stdin, tokio::io::stdout()) => {
            result?;
            info!("Client disconnected");
            false
        }
        result = wait_for_signal() => {
            result?;
            true
        }
    };

    engine.shutdown();

    if signalled {
        // The stdin reader sits on a blocking thread that would hold the
        // runtime open until the next line arrives.
        std::process::exit(0);
    }
    Ok(())
}

fn print_banner(config: &ServerConfig) {
    eprintln!("{} ChillMCP Server Starting...", "🚀".bold());
    eprintln!(
        "   {} {}%",
        "Boss Alertness:".cyan().bold(),
        config.boss_alertness()
    );
    eprintln!(
        "   {} {}s",
        "Boss Alert Cooldown:".cyan().bold(),
        config.boss_alertness_cooldown().as_secs()
    );
    eprintln!("   {}", "Listening on stdio transport...".green());
}

async fn wait_for_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
            _ = sigint.recv() => info!("Received SIGINT, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}
