use clap::Parser;
use kalshi_gateway::auth::Credentials;
use kalshi_gateway::cli::{Cli, Commands};
use kalshi_gateway::config::{Config, EXAMPLE_CONFIG};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Pick up KALSHI_* variables from a local .env, if present
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {:#}", cli.config, e);
            eprintln!("Using default configuration");
            Config::from_toml(EXAMPLE_CONFIG)?
        }
    };

    // Initialize telemetry
    let _telemetry = kalshi_gateway::telemetry::init_telemetry(&config.telemetry)?;

    let credentials = Credentials::from_env();

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting proxy server");
            args.execute(&config, credentials).await?;
        }
        Commands::Markets(args) => {
            tracing::debug!(view = %args.view, "Fetching ranked markets");
            args.execute(&config, credentials).await?;
        }
        Commands::Sign(args) => {
            args.execute(credentials)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Server: {} (mount {})", config.server.bind_addr, config.server.mount_path);
            println!(
                "  Cache: max-age={}s, unauthenticated reads: {}",
                config.server.cache_max_age_secs, config.server.allow_unauthenticated_reads
            );
            println!("  Upstream: {}", config.upstream.base_url);
            match config.upstream.timeout_secs {
                Some(secs) => println!("  Timeout: {}s", secs),
                None => println!("  Timeout: none"),
            }
            match credentials {
                Some(ref creds) => println!("  Credentials: key id {}", creds.key_id()),
                None => println!("  Credentials: not configured"),
            }
        }
    }

    Ok(())
}
