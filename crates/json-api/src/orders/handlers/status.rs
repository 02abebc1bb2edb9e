//! Update Order Status Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;
use uuid::Uuid;

use campus_app::domain::orders::{data::OrderStatusUpdate, records::OrderUuid};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::models::{OrderResponse, OrderStatusUpdateRequest},
};

/// Update Order Status Handler
///
/// Admins may move an order to any state; stock is never restored by cancelling.
#[endpoint(
    tags("admin"),
    summary = "Update Order Status",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<OrderStatusUpdateRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let update =
        OrderStatusUpdate::try_from(json.into_inner()).map_err(ApiError::validation_failed)?;

    let order = state
        .app
        .orders
        .update_order_status(OrderUuid::from_uuid(order.into_inner()), update)
        .await?;

    info!(
        order_number = %order.order_number,
        status = %order.status,
        payment_status = %order.payment_status,
        changed_by = %principal.user_uuid,
        "order status updated"
    );

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use campus_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        status::{OrderStatus, PaymentStatus},
    };

    use crate::{
        errors::ErrorResponse,
        orders::handlers::tests::make_order,
        test_helpers::{Mocks, TEST_USER_UUID, admin_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        admin_service(
            Mocks {
                orders,
                ..Mocks::default()
            },
            Router::with_path("admin/orders/{order}/status").patch(handler),
        )
    }

    #[tokio::test]
    async fn status_and_payment_are_applied() -> TestResult {
        let order = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order_status()
            .once()
            .withf(move |o, update| {
                *o == order
                    && update.status == OrderStatus::Shipped
                    && update.payment_status == Some(PaymentStatus::Paid)
            })
            .return_once(|order, update| {
                let mut record = make_order(order, TEST_USER_UUID);
                record.status = update.status;
                record.payment_status = update.payment_status.unwrap_or(record.payment_status);
                Ok(record)
            });

        let mut res = TestClient::patch(format!("http://example.com/admin/orders/{order}/status"))
            .json(&json!({ "status": "shipped", "payment_status": "paid" }))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "shipped");
        assert_eq!(body.payment_status, "paid");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_status_returns_422_without_calling_service() -> TestResult {
        let mut res = TestClient::patch(format!(
            "http://example.com/admin/orders/{}/status",
            Uuid::now_v7()
        ))
        .json(&json!({ "status": "teleported" }))
        .send(&make_service(MockOrdersService::new()))
        .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.error.code, "validation_failed");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order_status()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::patch(format!(
            "http://example.com/admin/orders/{}/status",
            Uuid::now_v7()
        ))
        .json(&json!({ "status": "cancelled" }))
        .send(&make_service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
