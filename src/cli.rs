//! Command-line interface definition for ZenMedic
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chatting, account access and the user profile.

use clap::{Parser, Subcommand};

/// ZenMedic - medical chat assistant for the terminal
///
/// Describe symptoms or ask health questions; replies come from a hosted
/// language model. Each prompt is also stored in your remote history.
#[derive(Parser, Debug, Clone)]
#[command(name = "zenmedic")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the completion model from config
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Override the user backend base URL from config
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for ZenMedic
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// User id whose history receives each prompt
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// Send a single prompt and print the reply
    Ask {
        /// The question or symptom description
        prompt: String,

        /// User id whose history receives the prompt
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// Log in and print your user id
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "ZENMEDIC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and print the new user id
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password (at least 6 characters)
        #[arg(short, long, env = "ZENMEDIC_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation
        #[arg(long)]
        confirm_password: String,
    },

    /// Show account details and past prompts
    Profile {
        /// User id to show
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// Permanently delete an account
    DeleteAccount {
        /// User id to delete
        #[arg(short, long)]
        user_id: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            model: None,
            backend_url: None,
            command: Commands::Chat { user_id: None },
        }
    }
}
