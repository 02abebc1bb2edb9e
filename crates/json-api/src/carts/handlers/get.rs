//! Get Cart Handler

use salvo::prelude::*;

use crate::{carts::models::CartResponse, errors::ApiError, extensions::*};

/// Get Cart Handler
///
/// Returns the caller's cart. Callers who never added anything get an empty cart.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let cart = state.app.carts.get_cart(principal.user_uuid).await?;

    Ok(Json(cart.into()))
}
