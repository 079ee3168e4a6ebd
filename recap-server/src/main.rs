use clap::Parser;
use recap_core::RecapConfig;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use recap_server::server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "recap.toml")]
    config: String,

    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Init logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Load config
    let config = match RecapConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Open the store and make sure the meetings table exists
    let pool = match recap_core::db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };
    recap_core::db::init_schema(&pool).await?;

    if args.health {
        match recap_core::db::health_check(&pool).await {
            Ok(v) => println!("SQLite connected: {}", v),
            Err(e) => {
                println!("SQLite connection failed: {}", e);
                std::process::exit(1);
            }
        }
        println!("Recap DB health check passed");
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    // HTTP transport, if enabled
    if config.http.enabled {
        let http_pool = pool.clone();
        let http_config = config.clone();
        let http_shutdown = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) =
                recap_server::http::start_http_server(http_pool, http_config, http_shutdown).await
            {
                tracing::error!("HTTP server error: {}", e);
            }
        });
    }

    // Socket transport in the foreground
    let socket_path = config.service.socket_path.clone();
    server::run_unix_server(&socket_path, pool, tx.subscribe()).await?;

    Ok(())
}
