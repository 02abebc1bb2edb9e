//! Remove from Wishlist Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use campus_app::domain::products::records::ProductUuid;

use crate::{errors::ApiError, extensions::*, products::models::ProductsResponse};

/// Remove from Wishlist Handler
#[endpoint(
    tags("wishlist"),
    summary = "Remove Product from Wishlist",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.state_or_500()?;
    let principal = depot.principal_or_401()?;

    let products = state
        .app
        .wishlists
        .remove_from_wishlist(
            principal.user_uuid,
            ProductUuid::from_uuid(product.into_inner()),
        )
        .await?;

    Ok(Json(products.into()))
}
