//! Create Product Handler

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    errors::ApiError,
    extensions::*,
    products::models::{ProductRequest, ProductResponse},
};

/// Create Product Handler
#[endpoint(
    tags("admin"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let product = state
        .app
        .products
        .create_product(json.into_inner().into())
        .await?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use campus_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };

    use crate::{
        errors::ErrorResponse,
        test_helpers::{Mocks, admin_service, make_product},
    };

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        admin_service(
            Mocks {
                products,
                ..Mocks::default()
            },
            Router::with_path("admin/products").post(handler),
        )
    }

    #[tokio::test]
    async fn create_product_returns_201_with_location() -> TestResult {
        let uuid = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .withf(|new| {
                new.name == "Campus Hoodie"
                    && new.price == 2_500
                    && new.active
                    && new.variants.len() == 1
            })
            .return_once(move |_| Ok(make_product(uuid)));

        let mut res = TestClient::post("http://example.com/admin/products")
            .json(&json!({
                "category_uuid": null,
                "name": "Campus Hoodie",
                "price": 2500,
                "quantity": 12,
                "variants": [{ "name": "size", "value": "XL", "price": 200 }]
            }))
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/products/{uuid}").as_str()));
        assert_eq!(body.uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_product_returns_422_with_reasons() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_create_product().once().return_once(|_| {
            Err(ProductsServiceError::InvalidData(vec![
                "name is required".to_string(),
            ]))
        });

        let mut res = TestClient::post("http://example.com/admin/products")
            .json(&json!({ "category_uuid": null, "name": "", "price": 1, "quantity": 1 }))
            .send(&make_service(products))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.error.reasons, vec!["name is required".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn negative_price_is_rejected_before_the_service() -> TestResult {
        let res = TestClient::post("http://example.com/admin/products")
            .json(&json!({ "category_uuid": null, "name": "Mug", "price": -5, "quantity": 1 }))
            .send(&make_service(MockProductsService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
