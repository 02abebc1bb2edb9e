//! Change Role Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;
use uuid::Uuid;

use campus_app::domain::users::records::{Role, UserUuid};

use crate::{
    errors::ApiError,
    extensions::*,
    users::models::{RoleRequest, UserResponse},
};

/// Change Role Handler
///
/// Grants or revokes admin access. Tokens already issued pick up the new role on their
/// next request.
#[endpoint(
    tags("admin"),
    summary = "Change User Role",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<RoleRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let role = json
        .into_inner()
        .role
        .parse::<Role>()
        .map_err(|error| ApiError::validation_failed(vec![error.to_string()]))?;

    let user = state
        .app
        .users
        .update_role(UserUuid::from_uuid(user.into_inner()), role)
        .await?;

    info!(
        user_uuid = %user.uuid,
        role = %user.role,
        changed_by = %principal.user_uuid,
        "user role changed"
    );

    Ok(Json(user.into()))
}
