//! Create Category Handler

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    categories::models::{CategoryRequest, CategoryResponse},
    errors::ApiError,
    extensions::*,
};

/// Create Category Handler
#[endpoint(
    tags("admin"),
    summary = "Create Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Category created"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CategoryRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CategoryResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let category = state
        .app
        .categories
        .create_category(json.into_inner().into())
        .await?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(category.into()))
}
