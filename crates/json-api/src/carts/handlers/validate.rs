//! Validate Cart Handler

use salvo::prelude::*;

use crate::{carts::models::CartResponse, errors::ApiError, extensions::*};

/// Validate Cart Handler
///
/// Re-checks every line against the live catalog before checkout. All problems are
/// reported together in the error's `reasons`.
#[endpoint(
    tags("cart"),
    summary = "Validate Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let cart = state.app.carts.validate_cart(principal.user_uuid).await?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use campus_app::domain::{
        carts::{CartsServiceError, MockCartsService, records::CartItemUuid},
        products::records::ProductUuid,
    };

    use crate::{
        carts::handlers::tests::make_cart,
        errors::ErrorResponse,
        test_helpers::{Mocks, student_service},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        student_service(
            Mocks {
                carts,
                ..Mocks::default()
            },
            Router::with_path("cart/validate").post(handler),
        )
    }

    #[tokio::test]
    async fn valid_cart_returns_200() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_validate_cart()
            .once()
            .return_once(|_| Ok(make_cart(CartItemUuid::new(), ProductUuid::new())));

        let res = TestClient::post("http://example.com/cart/validate")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn every_violation_is_reported() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_validate_cart().once().return_once(|_| {
            Err(CartsServiceError::ValidationFailed(vec![
                "Mug is no longer available".to_string(),
                "only 1 of Hoodie left, 3 requested".to_string(),
            ]))
        });

        let mut res = TestClient::post("http://example.com/cart/validate")
            .send(&make_service(carts))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.error.reasons.len(), 2);

        Ok(())
    }
}
