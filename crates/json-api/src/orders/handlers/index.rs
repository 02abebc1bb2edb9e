//! Order Index Handlers

use salvo::{oapi::extract::QueryParam, prelude::*};

use campus_app::domain::orders::{data::OrderFilter, status::OrderStatus};

use crate::{errors::ApiError, extensions::*, orders::models::OrdersResponse};

/// Order History Handler
///
/// Lists the caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List My Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders_for_user(principal.user_uuid)
        .await?;

    Ok(Json(orders.into()))
}

/// Admin Order Index Handler
///
/// Lists every order, newest first, optionally only those in one fulfilment state.
#[endpoint(
    tags("admin"),
    summary = "List Orders (admin)",
    security(("bearer_auth" = []))
)]
pub(crate) async fn admin_handler(
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let status = status
        .into_inner()
        .map(|status| status.parse::<OrderStatus>())
        .transpose()
        .map_err(|error| ApiError::validation_failed(vec![error.to_string()]))?;

    let orders = state.app.orders.list_orders(OrderFilter { status }).await?;

    Ok(Json(orders.into()))
}
