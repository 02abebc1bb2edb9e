//! Clear Cart Handler

use salvo::prelude::*;

use crate::{carts::models::CartResponse, errors::ApiError, extensions::*};

/// Clear Cart Handler
///
/// Removes every line from the caller's cart.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let cart = state.app.carts.clear_cart(principal.user_uuid).await?;

    Ok(Json(cart.into()))
}
