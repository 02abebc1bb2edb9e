use campus_app::domain::users::{
    PgUsersService, UsersService,
    data::NewUser,
    records::{Role, UserRecord},
};
use clap::{Args, Subcommand};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Register a user
    Create(CreateUserArgs),

    /// Grant the admin role to an existing user
    Promote(PromoteUserArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// `student` or `admin`
    #[arg(long, default_value = "student")]
    role: Role,
}

#[derive(Debug, Args)]
pub(crate) struct PromoteUserArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Email of the user to promote
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Create(args) => create(args).await,
        UserSubcommand::Promote(args) => promote(args).await,
    }
}

async fn create(args: CreateUserArgs) -> Result<(), String> {
    let db = args.database.connect().await?;
    let service = PgUsersService::new(db.clone());

    let result = service
        .create_user(NewUser {
            email: args.email,
            name: args.name,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"));

    db.close().await;

    print_user(&result?);

    Ok(())
}

async fn promote(args: PromoteUserArgs) -> Result<(), String> {
    let db = args.database.connect().await?;
    let service = PgUsersService::new(db.clone());

    let result = async {
        let user = service
            .find_user_by_email(&args.email)
            .await
            .map_err(|error| format!("failed to find user {}: {error}", args.email))?;

        service
            .update_role(user.uuid, Role::Admin)
            .await
            .map_err(|error| format!("failed to promote user: {error}"))
    }
    .await;

    db.close().await;

    print_user(&result?);

    Ok(())
}

fn print_user(user: &UserRecord) {
    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("name: {}", user.name);
    println!("role: {}", user.role);
}
