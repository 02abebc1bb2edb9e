//! Get Category Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use campus_app::domain::categories::records::CategoryUuid;

use crate::{categories::models::CategoryResponse, errors::ApiError, extensions::*};

/// Get Category Handler
#[endpoint(tags("categories"), summary = "Get Category")]
pub(crate) async fn handler(
    category: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let category = state
        .app
        .categories
        .get_category(CategoryUuid::from_uuid(category.into_inner()))
        .await?;

    Ok(Json(category.into()))
}
