//! Remove Cart Item Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use campus_app::domain::carts::records::CartItemUuid;

use crate::{carts::models::CartResponse, errors::ApiError, extensions::*};

/// Remove Cart Item Handler
///
/// Removing a line that is not there succeeds and returns the cart unchanged.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(principal.user_uuid, CartItemUuid::from_uuid(item.into_inner()))
        .await?;

    Ok(Json(cart.into()))
}
