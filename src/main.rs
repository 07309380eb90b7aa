use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cookshelf::cli;
use cookshelf_recipe::CreateUserInput;

/// cookshelf - Recipe sharing and shopping lists
#[derive(Parser)]
#[command(name = "cookshelf")]
#[command(about = "Recipe sharing service with printable shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Load catalog fixtures from JSON files
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user and print its token
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// Print a new token for an existing user
    Token {
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum ImportCommands {
    Ingredients { path: PathBuf },
    Tags { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cookshelf::Config::load(cli.config.clone())?;
    match cli.command {
        Commands::Serve { .. } | Commands::User { .. } => config.validate(),
        Commands::Migrate | Commands::Import { .. } => config.validate_database(),
    }
    .map_err(|e| anyhow::anyhow!(e))?;

    cookshelf::observability::init_observability("cookshelf", &config.observability)?;

    match cli.command {
        Commands::Serve { host, port } => cli::serve(config, host, port).await,
        Commands::Migrate => cli::migrate(config).await,
        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                username,
                first_name,
                last_name,
            } => {
                let token = cli::create_user(
                    config,
                    CreateUserInput {
                        email,
                        username,
                        first_name,
                        last_name,
                    },
                )
                .await?;
                println!("{token}");

                Ok(())
            }
            UserCommands::Token { email } => {
                let token = cli::issue_token(config, email).await?;
                println!("{token}");

                Ok(())
            }
        },
        Commands::Import { command } => {
            match command {
                ImportCommands::Ingredients { path } => {
                    cli::import_ingredients(config, &path).await?
                }
                ImportCommands::Tags { path } => cli::import_tags(config, &path).await?,
            };

            Ok(())
        }
    }
}
