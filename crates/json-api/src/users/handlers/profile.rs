//! Profile Handlers

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    errors::ApiError,
    extensions::*,
    users::models::{ProfileRequest, UserResponse},
};

/// Get Profile Handler
#[endpoint(
    tags("profile"),
    summary = "Get Profile",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let user = state.app.users.get_user(principal.user_uuid).await?;

    Ok(Json(user.into()))
}

/// Update Profile Handler
///
/// Replaces the caller's name, phone and avatar.
#[endpoint(
    tags("profile"),
    summary = "Update Profile",
    security(("bearer_auth" = []))
)]
pub(crate) async fn update_handler(
    json: JsonBody<ProfileRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let user = state
        .app
        .users
        .update_profile(principal.user_uuid, json.into_inner().into())
        .await?;

    Ok(Json(user.into()))
}
