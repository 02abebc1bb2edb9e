//! Get Product Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use campus_app::domain::products::records::ProductUuid;

use crate::{errors::ApiError, extensions::*, products::models::ProductResponse};

/// Get Product Handler
///
/// Returns a product on sale. Products switched off for sale read as absent.
#[endpoint(tags("products"), summary = "Get Product")]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let product = state
        .app
        .products
        .get_product(ProductUuid::from_uuid(product.into_inner()))
        .await?;

    if !product.is_purchasable() {
        return Err(ApiError::not_found("product not found"));
    }

    Ok(Json(product.into()))
}
