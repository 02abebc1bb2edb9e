//! Add Cart Item Handler

use salvo::{oapi::extract::JsonBody, prelude::*};

use campus_app::domain::carts::data::NewCartItem;

use crate::{
    carts::models::{AddCartItemRequest, CartResponse},
    errors::ApiError,
    extensions::*,
};

/// Add Cart Item Handler
///
/// Adds a product to the caller's cart. A line for the same product with the same
/// options is topped up instead of duplicated, keeping its original price.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let item = NewCartItem::try_from(json.into_inner()).map_err(ApiError::validation_failed)?;

    let cart = state.app.carts.add_item(principal.user_uuid, item).await?;

    Ok(Json(cart.into()))
}
