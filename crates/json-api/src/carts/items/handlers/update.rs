//! Update Cart Item Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use campus_app::domain::carts::records::CartItemUuid;

use crate::{
    carts::models::{CartResponse, UpdateCartItemRequest},
    errors::ApiError,
    extensions::*,
};

/// Update Cart Item Handler
///
/// Sets the quantity of one line. Zero is rejected rather than treated as removal.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item Quantity",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let quantity = json.into_inner().quantity().map_err(ApiError::validation_failed)?;

    let cart = state
        .app
        .carts
        .update_item_quantity(
            principal.user_uuid,
            CartItemUuid::from_uuid(item.into_inner()),
            quantity,
        )
        .await?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use campus_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        products::records::ProductUuid,
    };

    use crate::{
        carts::handlers::tests::make_cart,
        errors::ErrorResponse,
        test_helpers::{Mocks, TEST_USER_UUID, student_service},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        student_service(
            Mocks {
                carts,
                ..Mocks::default()
            },
            Router::with_path("cart/items/{item}").put(handler),
        )
    }

    #[tokio::test]
    async fn update_forwards_item_and_quantity() -> TestResult {
        let item = CartItemUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_update_item_quantity()
            .once()
            .withf(move |user, i, quantity| *user == TEST_USER_UUID && *i == item && *quantity == 3)
            .return_once(move |_, _, _| Ok(make_cart(item, ProductUuid::new())));

        let res = TestClient::put(format!("http://example.com/cart/items/{item}"))
            .json(&json!({ "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn quantity_zero_returns_422() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_update_item_quantity().once().return_once(|_, _, _| {
            Err(CartsServiceError::ValidationFailed(vec![
                "quantity must be between 1 and 10, got 0".to_string(),
            ]))
        });

        let res = TestClient::put(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_item_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_update_item_quantity()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn negative_quantity_returns_422_envelope() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_update_item_quantity().never();

        let mut res = TestClient::put(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": -1 }))
            .send(&make_service(carts))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.error.code, "validation_failed");
        assert_eq!(body.error.reasons, ["quantity must be between 1 and 10, got -1"]);

        Ok(())
    }
}
