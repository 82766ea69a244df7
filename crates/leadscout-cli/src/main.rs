mod discover;
mod validate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadscout-cli")]
#[command(about = "Find local businesses without a website")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the configured sources for businesses near a location
    Discover {
        /// City to search in (e.g., Reno)
        #[arg(long)]
        city: String,
        /// State or region (e.g., NV)
        #[arg(long)]
        state: String,
        /// Search radius in miles
        #[arg(long, default_value = "5")]
        radius: f64,
        /// Business category (e.g., plumber); "all" searches every category
        #[arg(long, default_value = "all")]
        category: String,
        /// Write the results to a CSV file in the export directory
        #[arg(long)]
        export: bool,
    },
    /// Check whether a website answers
    Validate {
        /// URL or bare host to probe
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = leadscout_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Discover {
            city,
            state,
            radius,
            category,
            export,
        }) => {
            let args = discover::DiscoverArgs {
                city,
                state,
                radius,
                category,
                export,
            };
            discover::run_discover(&config, &args).await?;
        }
        Some(Commands::Validate { url }) => validate::run_validate(&config, &url).await?,
        None => println!("leadscout-cli: run with --help to see available commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
