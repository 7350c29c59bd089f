use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use salesdm_core::{AgentRequest, AgentResponse, ChannelId, presets};
use salesdm_gateway::GatewayServer;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::SalesdmConfig;

#[derive(Parser)]
#[command(name = "salesdm")]
#[command(version)]
#[command(about = "salesdm - brand-voiced replies for social commerce DMs")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Craft a single reply and print it
    Ask {
        /// The customer's message
        message: String,

        /// whatsapp, messenger or instagram
        #[arg(short, long, default_value = "whatsapp")]
        platform: String,

        /// Customer name used in the greeting
        #[arg(long)]
        customer_name: Option<String>,

        /// Use a built-in persona preset instead of the configured persona
        #[arg(long)]
        preset: Option<String>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// List built-in persona presets
    Presets,

    /// Initialize config directory and default config
    Init,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging; RUST_LOG wins over the flag and the config file
    let level = if cli.debug {
        "debug".to_string()
    } else {
        SalesdmConfig::load(&cli.config)
            .map(|cfg| cfg.logging.level)
            .unwrap_or_else(|_| "info".to_string())
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => cmd_init().await,
        Commands::Config => cmd_config(&cli.config),
        Commands::Presets => cmd_presets(),
        Commands::Serve { port } => cmd_serve(&cli.config, port).await,
        Commands::Ask {
            message,
            platform,
            customer_name,
            preset,
            json,
        } => cmd_ask(&cli.config, &message, &platform, customer_name, preset.as_deref(), json),
    }
}

async fn cmd_init() -> Result<()> {
    let config_dir = config::config_dir();
    tokio::fs::create_dir_all(&config_dir)
        .await
        .with_context(|| format!("Failed to create config dir: {}", config_dir.display()))?;

    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        warn!("Config already exists at {}", config_path.display());
    } else {
        let default_config = include_str!("../../../config/default.toml");
        tokio::fs::write(&config_path, default_config).await?;
        info!("Created default config at {}", config_path.display());
    }

    println!("salesdm initialized at {}", config_dir.display());
    println!("Edit {} to set your brand persona.", config_path.display());
    Ok(())
}

fn cmd_config(config_path: &Option<PathBuf>) -> Result<()> {
    let cfg = SalesdmConfig::load(config_path)?;
    println!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}

fn cmd_presets() -> Result<()> {
    for preset in presets::PRESETS.iter() {
        println!("{}", preset.brand_name);
        println!("  voice:     {}", preset.brand_voice);
        println!("  offer:     {}", preset.signature_offer);
        println!("  cta:       {}", preset.call_to_action);
        println!("  guarantee: {}", preset.guarantee);
        println!("  follow-up: {}", preset.follow_up_delay);
    }
    Ok(())
}

async fn cmd_serve(config_path: &Option<PathBuf>, port: Option<u16>) -> Result<()> {
    let mut cfg = SalesdmConfig::load(config_path)?;
    if let Some(port) = port {
        cfg.server.port = port;
    }
    let bind = cfg.bind_addr()?;
    let persona = cfg.persona();
    info!("Serving replies as '{}'", persona.brand_name);

    GatewayServer::new(bind, persona)
        .run(async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await
}

fn cmd_ask(
    config_path: &Option<PathBuf>,
    message: &str,
    platform: &str,
    customer_name: Option<String>,
    preset: Option<&str>,
    json: bool,
) -> Result<()> {
    let platform: ChannelId = platform.parse()?;
    let persona = match preset {
        Some(name) => presets::find(name).with_context(|| {
            let known: Vec<&str> = presets::PRESETS.iter().map(|p| p.brand_name).collect();
            format!("Unknown preset '{}'. Available: {}", name, known.join(", "))
        })?,
        None => SalesdmConfig::load(config_path)?.persona(),
    };

    let request = AgentRequest {
        message: message.to_string(),
        platform,
        persona,
        customer_name,
    };
    let response = salesdm_core::generate_reply(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

fn print_response(response: &AgentResponse) {
    println!("{}", response.reply);
    println!();
    println!(
        "intent: {} ({:.0}% confidence)",
        response.intent,
        response.confidence * 100.0
    );
    println!("call to action: {}", response.call_to_action);
    println!("follow-up: {}", response.follow_up);
    println!("next steps:");
    for step in &response.suggested_next_steps {
        println!("  - {}", step);
    }
}
