//! Riju CLI
//!
//! Command-line interface for the Riju session API

mod api;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API server address (defaults to the value in ~/.config/riju/cli.toml)
    #[arg(short, long)]
    server: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user sessions
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// List user sessions
    List,
    /// Show one user session
    Show { id: String },
    /// Create a user session
    Create {
        /// Session ID (lowercase letters, digits and '-')
        id: String,
        /// Language ID
        #[arg(short, long)]
        lang: String,
        /// Revision of the session agent binary
        #[arg(long)]
        agent: String,
        /// Revision of the ptyify binary
        #[arg(long)]
        ptyify: String,
        /// Revision of the language image
        #[arg(long)]
        lang_image: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load().unwrap_or_default();
    let server = cli.server.unwrap_or(config.default_server);
    let output = cli.output.unwrap_or(config.default_output);

    let api_client = api::ApiClient::new(&server);

    match cli.command {
        Commands::Session { command } => {
            commands::session::handle_session_command(command, &api_client, &output).await?
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
