// src/main.rs
// Beacon - emergency text classification service

use anyhow::Result;
use beacon::config::{EnvConfig, env::log_level_from_env};
use beacon::web;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "beacon")]
#[command(about = "Classify emergency text messages with a generative model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Address to bind
    #[arg(long, global = true, env = "BEACON_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, global = true, env = "BEACON_PORT", default_value = "8000")]
    port: u16,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Print the configuration report and exit
    CheckConfig,
}

async fn run_server(config: EnvConfig, host: String, port: u16) -> beacon::Result<()> {
    let state = web::state::AppState::from_config(&config);
    let app = web::create_router(state, config.request_timeout);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Beacon listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Beacon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn check_config(config: &EnvConfig) -> Result<()> {
    println!("{}", config.api_keys.summary());
    println!("Model: {}", config.model);

    let validation = config.validate();
    println!("{}", validation.report());

    validation.into_result()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level_from_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = EnvConfig::load();

    match cli.command {
        Some(Commands::CheckConfig) => check_config(&config)?,
        None | Some(Commands::Serve) => {
            let validation = config.validate();
            for warning in &validation.warnings {
                warn!("{}", warning);
            }
            for err in &validation.errors {
                error!("{}", err);
            }
            validation.into_result()?;
            run_server(config, cli.host, cli.port).await?;
        }
    }

    Ok(())
}
