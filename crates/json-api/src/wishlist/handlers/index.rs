//! Wishlist Index Handler

use salvo::prelude::*;

use crate::{errors::ApiError, extensions::*, products::models::ProductsResponse};

/// Wishlist Index Handler
///
/// Lists the products the caller has saved. Deleted products drop out on their own.
#[endpoint(
    tags("wishlist"),
    summary = "Get Wishlist",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let products = state
        .app
        .wishlists
        .list_wishlist(principal.user_uuid)
        .await?;

    Ok(Json(products.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use campus_app::domain::{
        products::records::ProductUuid,
        wishlists::{MockWishlistsService, WishlistsServiceError},
    };

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_product, student_service};

    use super::*;

    fn make_service(wishlists: MockWishlistsService) -> Service {
        student_service(
            Mocks {
                wishlists,
                ..Mocks::default()
            },
            Router::with_path("wishlist").get(handler),
        )
    }

    #[tokio::test]
    async fn lists_saved_products() -> TestResult {
        let mut wishlists = MockWishlistsService::new();

        wishlists
            .expect_list_wishlist()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(vec![make_product(ProductUuid::new())]));

        let mut res = TestClient::get("http://example.com/wishlist")
            .send(&make_service(wishlists))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.products.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn storage_timeout_returns_503() -> TestResult {
        let mut wishlists = MockWishlistsService::new();

        wishlists
            .expect_list_wishlist()
            .once()
            .return_once(|_| Err(WishlistsServiceError::StorageTimeout(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/wishlist")
            .send(&make_service(wishlists))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        Ok(())
    }
}
