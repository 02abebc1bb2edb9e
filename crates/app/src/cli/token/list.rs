use campus_app::{
    auth::{AuthService, PgAuthService},
    domain::users::records::UserUuid,
};
use clap::Args;
use jiff::Timestamp;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// User whose tokens should be listed
    #[arg(long)]
    user_uuid: UserUuid,
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    let result = PgAuthService::new(db.pool().clone())
        .list_api_tokens(args.user_uuid)
        .await
        .map_err(|error| format!("failed to list tokens: {error}"));

    db.close().await;

    let tokens = result?;

    if tokens.is_empty() {
        println!("no tokens found for user {}", args.user_uuid);
        return Ok(());
    }

    let now = Timestamp::now();

    for token in tokens {
        let last_used = token
            .last_used_at
            .map_or_else(|| "never".to_string(), |value| value.to_string());
        let expires = token
            .expires_at
            .map_or_else(|| "never".to_string(), |value| value.to_string());

        println!(
            "{uuid}  v{version}  {state:<8}  created {created}  last used {last_used}  expires {expires}",
            uuid = token.uuid,
            version = token.version.as_i16(),
            state = token.state_at(now),
            created = token.created_at,
        );
    }

    Ok(())
}
