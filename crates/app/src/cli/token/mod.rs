//! `campus-app token ...`: bearer tokens for existing users.

use clap::Subcommand;

mod create;
mod list;
mod revoke;

#[derive(Debug, Subcommand)]
pub(crate) enum TokenCommand {
    /// Issue a bearer token for a user
    Create(create::CreateTokenArgs),

    /// Show the tokens issued to a user
    List(list::ListTokensArgs),

    /// Revoke a token by its uuid
    Revoke(revoke::RevokeTokenArgs),
}

impl TokenCommand {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self {
            Self::Create(args) => create::run(args).await,
            Self::List(args) => list::run(args).await,
            Self::Revoke(args) => revoke::run(args).await,
        }
    }
}
