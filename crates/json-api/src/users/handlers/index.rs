//! User Index Handler

use salvo::prelude::*;

use crate::{errors::ApiError, extensions::*, users::models::UsersResponse};

/// User Index Handler
#[endpoint(
    tags("admin"),
    summary = "List Users",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UsersResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let users = state.app.users.list_users().await?;

    Ok(Json(users.into()))
}
