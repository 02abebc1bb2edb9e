//! Product Index Handlers

use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use campus_app::domain::{categories::records::CategoryUuid, products::data::ProductFilter};

use crate::{errors::ApiError, extensions::*, products::models::ProductsResponse};

/// Product Index Handler
///
/// Lists the products on sale, optionally within one category.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    category: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let products = state
        .app
        .products
        .list_products(ProductFilter {
            category: category.into_inner().map(CategoryUuid::from_uuid),
            include_inactive: false,
        })
        .await?;

    Ok(Json(products.into()))
}

/// Admin Product Index Handler
///
/// Lists every live product, including those switched off for sale.
#[endpoint(
    tags("admin"),
    summary = "List Products (admin)",
    security(("bearer_auth" = []))
)]
pub(crate) async fn admin_handler(
    category: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let products = state
        .app
        .products
        .list_products(ProductFilter {
            category: category.into_inner().map(CategoryUuid::from_uuid),
            include_inactive: true,
        })
        .await?;

    Ok(Json(products.into()))
}
