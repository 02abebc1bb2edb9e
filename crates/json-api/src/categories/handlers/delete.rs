//! Delete Category Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use campus_app::domain::categories::records::CategoryUuid;

use crate::{errors::ApiError, extensions::*};

/// Delete Category Handler
///
/// Soft-deletes a category; its slug becomes free for reuse.
#[endpoint(
    tags("admin"),
    summary = "Delete Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Category deleted"),
    ),
)]
pub(crate) async fn handler(
    category: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.state_or_500()?;

    state
        .app
        .categories
        .delete_category(CategoryUuid::from_uuid(category.into_inner()))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
