//! Category Index Handler

use salvo::prelude::*;

use crate::{categories::models::CategoriesResponse, errors::ApiError, extensions::*};

/// Category Index Handler
///
/// Lists every live category by name.
#[endpoint(tags("categories"), summary = "List Categories")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CategoriesResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let categories = state.app.categories.list_categories().await?;

    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}
