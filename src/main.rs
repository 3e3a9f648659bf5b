use anyhow::{Context, Result};
use briefing::config::{default_config_path, AppConfig};
use briefing::topics_cli::{self, TopicCommands};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "briefing")]
#[command(about = "Topic interest tracking and content ranking for personal briefings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value_t = default_config_path())]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and open the store
    CheckConfig,
    #[command(flatten)]
    Topics(TopicCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    config.expand_paths();

    init_logging(&config.logging.level)?;

    config
        .validate()
        .with_context(|| "Configuration validation failed")?;

    match cli.command {
        Commands::CheckConfig => check_config(&config).await,
        Commands::Topics(cmd) => {
            let engine = briefing::open_engine(&config)?;
            topics_cli::handle_command(cmd, &engine).await
        }
    }
}

async fn check_config(config: &AppConfig) -> Result<()> {
    println!("Testing configuration...");
    println!("✓ Configuration is valid");

    let engine = briefing::open_engine(config)?;
    let active = engine.active_topics().await?;
    println!("✓ Topic store opened: {}", config.store.db_path);
    println!("  {} active topic(s)", active.len());
    println!(
        "  alpha={} serendipity={}",
        config.scoring.alpha,
        if config.scoring.serendipity.enabled { "on" } else { "off" }
    );
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter.to_string())),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    Ok(())
}
