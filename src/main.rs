//! Gravitas - persona-routing streaming chat proxy
//!
//! Serves a chat endpoint that routes each conversation to a coaching
//! persona and streams the provider's reply back as server-sent events.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gravitas::{
    config::{resolve_api_key_from_env, GravitasConfig},
    gateway::GatewayBuilder,
    personas::PersonaRegistry,
    routing::{assess_relevance, normalize, IntentRouter, RoutingDecision},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gravitas")]
#[command(author = "Gravitas Team")]
#[command(version)]
#[command(about = "Persona-routing streaming chat proxy")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GRAVITAS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show which persona a message would be routed to
    Route {
        /// Message text
        text: String,
    },

    /// List the persona catalog
    Personas,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let default_filter = format!("gravitas={},tower_http={}", log_level, log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(cli.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    // Load configuration
    let config = GravitasConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            run_server(config, host, port).await?;
        }
        Commands::Route { text } => {
            show_route(&text)?;
        }
        Commands::Personas => {
            list_personas()?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_server(
    config: GravitasConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting Gravitas");

    let api_key = resolve_api_key_from_env(&config.provider);

    let mut builder = GatewayBuilder::new().config(config).api_key(api_key);
    if let Some(host) = host {
        builder = builder.host(host);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }
    let gateway = builder.build()?;

    tracing::info!("Gravitas is running. Press Ctrl+C to stop.");
    gateway.run().await?;

    Ok(())
}

fn show_route(text: &str) -> Result<()> {
    let registry = Arc::new(PersonaRegistry::builtin()?);
    let router = IntentRouter::new(registry);

    println!("relevance: {:?}", assess_relevance(&normalize(text)));
    match router.route(text) {
        RoutingDecision::Persona(profile) => {
            println!("persona:   {} ({})", profile.id, profile.display_name);
        }
        RoutingDecision::OutOfScope(refusal) => {
            println!("persona:   out of scope");
            println!();
            println!("{}", refusal);
        }
    }
    Ok(())
}

fn list_personas() -> Result<()> {
    let registry = PersonaRegistry::builtin()?;
    for profile in registry.all() {
        println!(
            "{:<10} {:<12} {}",
            profile.id.as_str(),
            format!("{:?}", profile.kind),
            profile.display_name
        );
    }
    Ok(())
}

fn show_config(config: Option<&GravitasConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
