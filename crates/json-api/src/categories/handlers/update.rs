//! Update Category Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use campus_app::domain::categories::records::CategoryUuid;

use crate::{
    categories::models::{CategoryRequest, CategoryResponse},
    errors::ApiError,
    extensions::*,
};

/// Update Category Handler
#[endpoint(
    tags("admin"),
    summary = "Update Category",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    category: PathParam<Uuid>,
    json: JsonBody<CategoryRequest>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let category = state
        .app
        .categories
        .update_category(
            CategoryUuid::from_uuid(category.into_inner()),
            json.into_inner().into(),
        )
        .await?;

    Ok(Json(category.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use campus_app::domain::categories::{CategoriesServiceError, MockCategoriesService};

    use crate::test_helpers::{Mocks, admin_service};

    use super::*;

    #[tokio::test]
    async fn invalid_slug_returns_422() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories.expect_update_category().once().return_once(|_, _| {
            Err(CategoriesServiceError::InvalidData(vec![
                "slug may only contain lowercase letters, digits and single hyphens".to_string(),
            ]))
        });

        let res = TestClient::put(format!(
            "http://example.com/admin/categories/{}",
            Uuid::now_v7()
        ))
        .json(&json!({ "name": "Stationery", "slug": "Stationery!" }))
        .send(&admin_service(
            Mocks {
                categories,
                ..Mocks::default()
            },
            Router::with_path("admin/categories/{category}").put(handler),
        ))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
