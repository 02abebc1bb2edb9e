//! Get Order Handlers

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use campus_app::domain::orders::records::OrderUuid;

use crate::{errors::ApiError, extensions::*, orders::models::OrderResponse};

/// Get Order Handler
///
/// Returns one of the caller's orders. Orders placed by anyone else read as absent.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .get_order_for_user(principal.user_uuid, OrderUuid::from_uuid(order.into_inner()))
        .await?;

    Ok(Json(order.into()))
}

/// Admin Get Order Handler
#[endpoint(
    tags("admin"),
    summary = "Get Order (admin)",
    security(("bearer_auth" = []))
)]
pub(crate) async fn admin_handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let order = state
        .app
        .orders
        .get_order(OrderUuid::from_uuid(order.into_inner()))
        .await?;

    Ok(Json(order.into()))
}
