//! ZenMedic - medical chat assistant CLI
//!
#![doc = "ZenMedic - medical chat assistant CLI"]
#![doc = "Main entry point for the ZenMedic application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zenmedic::cli::{Cli, Commands};
use zenmedic::commands;
use zenmedic::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { user_id } => {
            commands::chat::run_chat(config, user_id).await?;
            Ok(())
        }
        Commands::Ask { prompt, user_id } => {
            tracing::info!("Running single prompt");
            commands::ask::run_ask(config, prompt, user_id).await?;
            Ok(())
        }
        Commands::Login { email, password } => {
            commands::account::login(&config, &email, &password).await?;
            Ok(())
        }
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            commands::account::signup(&config, &name, &email, &password, &confirm_password)
                .await?;
            Ok(())
        }
        Commands::Profile { user_id } => {
            commands::account::show_profile(&config, user_id).await?;
            Ok(())
        }
        Commands::DeleteAccount { user_id, yes } => {
            commands::account::delete_account(&config, user_id, yes).await?;
            Ok(())
        }
    }
}

/// Initialize logging to stderr so replies on stdout stay clean
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "zenmedic=debug"
    } else {
        "zenmedic=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
