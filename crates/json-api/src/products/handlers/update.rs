//! Update Product Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use campus_app::domain::products::records::ProductUuid;

use crate::{
    errors::ApiError,
    extensions::*,
    products::models::{ProductRequest, ProductResponse},
};

/// Update Product Handler
///
/// Replaces every editable field. Existing cart lines and orders keep the prices they captured.
#[endpoint(
    tags("admin"),
    summary = "Update Product",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let updated = state
        .app
        .products
        .update_product(
            ProductUuid::from_uuid(product.into_inner()),
            json.into_inner().into(),
        )
        .await?;

    Ok(Json(updated.into()))
}
