mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use tubemark::config::Config;
use tubemark::health::HealthProber;
use tubemark::resolver::MetadataResolver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logs go to stderr so `resolve`/`health` output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve(args) => {
            let address = args.address.unwrap_or(config.server.bind_addr);
            tubemark::api::run(address, config).await?;
        }
        Commands::Resolve(args) => {
            let resolver = MetadataResolver::new(&config.fetch_config(), config.resolver_settings())?;
            let result = resolver.resolve(&args.url).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Health => {
            let prober = HealthProber::new(&config.fetch_config(), config.probe_settings())?;
            let health = prober.check_health().await;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
    }

    Ok(())
}
