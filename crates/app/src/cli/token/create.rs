use campus_app::{
    auth::{AuthService, PgAuthService},
    domain::users::{PgUsersService, UsersService},
};
use clap::Args;
use jiff::Timestamp;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Email of the user that should own the token
    #[arg(long)]
    email: String,

    /// Optional token expiration timestamp (RFC 3339)
    #[arg(long)]
    expires_at: Option<Timestamp>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    if let Some(expires_at) = args.expires_at
        && expires_at <= Timestamp::now()
    {
        return Err("expires-at must be in the future".to_string());
    }

    let db = args.database.connect().await?;
    let users = PgUsersService::new(db.clone());
    let auth = PgAuthService::new(db.pool().clone());

    let result = async {
        let user = users
            .find_user_by_email(&args.email)
            .await
            .map_err(|error| format!("failed to find user {}: {error}", args.email))?;

        auth.issue_api_token(user.uuid, args.expires_at)
            .await
            .map_err(|error| format!("failed to create token: {error}"))
    }
    .await;

    db.close().await;

    let issued = result?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_version: {}", issued.metadata.version.as_i16());
    println!("token_created_at: {}", issued.metadata.created_at);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("token_expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
