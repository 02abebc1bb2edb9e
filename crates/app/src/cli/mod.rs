use std::time::Duration;

use campus_app::database::{self, DatabaseOptions, Db};
use clap::{Args, Parser, Subcommand};

mod db;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "campus-app", about = "Campus Store operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    #[command(subcommand)]
    Token(token::TokenCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => command.run().await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Connection settings shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Per-statement execution limit in milliseconds
    #[arg(long, env = "DATABASE_STATEMENT_TIMEOUT_MS", default_value_t = 5_000)]
    statement_timeout_ms: u64,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        let options = DatabaseOptions {
            max_connections: 2,
            statement_timeout: Duration::from_millis(self.statement_timeout_ms),
            ..DatabaseOptions::default()
        };

        let pool = database::connect(&self.database_url, options)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;

        Ok(Db::new(pool, options.statement_timeout))
    }
}
