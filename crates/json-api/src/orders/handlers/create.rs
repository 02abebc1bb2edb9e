//! Checkout Handler

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use tracing::info;

use campus_app::domain::orders::data::CheckoutPayload;

use crate::{
    errors::ApiError,
    extensions::*,
    observability::record_checkout,
    orders::models::{CheckoutRequest, OrderConfirmationResponse},
};

/// Checkout Handler
///
/// Turns the caller's cart into a pending order. Stock is taken and the cart emptied in
/// the same step; on any failure nothing changes.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderConfirmationResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let outcome = match CheckoutPayload::try_from(json.into_inner()) {
        Ok(payload) => state
            .app
            .orders
            .create_order(principal.user_uuid, payload)
            .await
            .map_err(ApiError::from),
        Err(reasons) => Err(ApiError::validation_failed(reasons)),
    };

    record_checkout(outcome.as_ref().map(|_| ()).map_err(ApiError::code));

    let confirmation = outcome?;

    info!(
        order_number = %confirmation.order_number,
        total = confirmation.total_amount,
        "order placed"
    );

    res.add_header(
        LOCATION,
        format!("/orders/{}", confirmation.order_uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(confirmation.into()))
}
