//! Delete Product Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use campus_app::domain::products::records::ProductUuid;

use crate::{errors::ApiError, extensions::*};

/// Delete Product Handler
///
/// Soft-deletes a product. Orders that include it are unaffected.
#[endpoint(
    tags("admin"),
    summary = "Delete Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Product deleted"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.state_or_500()?;

    state
        .app
        .products
        .delete_product(ProductUuid::from_uuid(product.into_inner()))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use campus_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::test_helpers::{Mocks, admin_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        admin_service(
            Mocks {
                products,
                ..Mocks::default()
            },
            Router::with_path("admin/products/{product}").delete(handler),
        )
    }

    #[tokio::test]
    async fn delete_product_returns_204() -> TestResult {
        let uuid = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_delete_product()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(|_| Ok(()));

        let res = TestClient::delete(format!("http://example.com/admin/products/{uuid}"))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_delete_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/admin/products/{}", Uuid::now_v7()))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
