//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::Span;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductFilter, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .repository
            .find_product(&mut tx, product)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = tracing::field::Empty),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let problems = product.problems();

        if !problems.is_empty() {
            return Err(ProductsServiceError::InvalidData(problems));
        }

        let uuid = ProductUuid::new();

        Span::current().record("product_uuid", tracing::field::display(uuid));

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product(&mut tx, uuid, &product)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, update),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let problems = update.problems();

        if !problems.is_empty() {
            return Err(ProductsServiceError::InvalidData(problems));
        }

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "products.service.delete_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "products.service.decrement_stock",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn decrement_stock(
        &self,
        product: ProductUuid,
        amount: u32,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if amount == 0 {
            return Err(ProductsServiceError::InvalidData(vec![
                "amount must be at least 1".to_string(),
            ]));
        }

        let mut tx = self.db.begin().await?;

        let Some(updated) = self
            .repository
            .decrement_stock(&mut tx, product, amount)
            .await?
        else {
            let current = self
                .repository
                .find_product(&mut tx, product)
                .await?
                .ok_or(ProductsServiceError::NotFound)?;

            return Err(ProductsServiceError::InsufficientStock {
                available: current.quantity,
            });
        };

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve live products matching the filter, ordered by name.
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single live product, whether or not it is active.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Create a product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replace the details of a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-delete a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Take units out of stock, failing without change when too few remain.
    async fn decrement_stock(
        &self,
        product: ProductUuid,
        amount: u32,
    ) -> Result<ProductRecord, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            categories::{CategoriesService, data::CategoryDetails, records::CategoryUuid},
            products::records::ProductVariant,
        },
        test::{TestContext, helpers::product_details},
    };

    use super::*;

    #[tokio::test]
    async fn create_product_stores_details() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .products
            .create_product(NewProduct {
                variants: vec![ProductVariant {
                    name: "size".to_string(),
                    value: "XL".to_string(),
                    price: 200,
                }],
                ..product_details(2_500, 7)
            })
            .await?;

        let fetched = ctx.products.get_product(product.uuid).await?;

        assert_eq!(fetched, product);
        assert_eq!(fetched.price, 2_500);
        assert_eq!(fetched.quantity, 7);
        assert_eq!(fetched.variants.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_category_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(NewProduct {
                category_uuid: Some(CategoryUuid::new()),
                ..product_details(100, 1)
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn public_listing_hides_inactive_products() -> TestResult {
        let ctx = TestContext::new().await;

        let active = ctx.create_product(100, 1).await;
        let inactive = ctx
            .products
            .create_product(NewProduct {
                active: false,
                ..product_details(100, 1)
            })
            .await?;

        let public = ctx.products.list_products(ProductFilter::default()).await?;
        let admin = ctx
            .products
            .list_products(ProductFilter {
                include_inactive: true,
                ..ProductFilter::default()
            })
            .await?;

        assert!(public.iter().any(|p| p.uuid == active.uuid));
        assert!(!public.iter().any(|p| p.uuid == inactive.uuid));
        assert_eq!(admin.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn listing_filters_by_category() -> TestResult {
        let ctx = TestContext::new().await;

        let category = ctx
            .categories
            .create_category(CategoryDetails {
                name: "Mugs".to_string(),
                slug: "mugs".to_string(),
                description: None,
                image_url: None,
            })
            .await?;

        let mug = ctx
            .products
            .create_product(NewProduct {
                category_uuid: Some(category.uuid),
                ..product_details(900, 3)
            })
            .await?;

        ctx.create_product(100, 1).await;

        let listed = ctx
            .products
            .list_products(ProductFilter {
                category: Some(category.uuid),
                include_inactive: false,
            })
            .await?;

        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().map(|p| p.uuid), Some(mug.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn update_product_replaces_details() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(500, 2).await;

        let updated = ctx
            .products
            .update_product(
                product.uuid,
                ProductUpdate {
                    name: "Renamed".to_string(),
                    ..product_details(750, 9)
                },
            )
            .await?;

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.price, 750);
        assert_eq!(updated.quantity, 9);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_is_not_found_or_listed() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(300, 1).await;

        ctx.products.delete_product(product.uuid).await?;

        let result = ctx.products.get_product(product.uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        let listed = ctx
            .products
            .list_products(ProductFilter {
                include_inactive: true,
                ..ProductFilter::default()
            })
            .await?;

        assert!(listed.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn decrement_stock_reduces_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(100, 5).await;

        let updated = ctx.products.decrement_stock(product.uuid, 3).await?;

        assert_eq!(updated.quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn decrement_stock_beyond_quantity_leaves_stock_untouched() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(100, 2).await;

        let result = ctx.products.decrement_stock(product.uuid, 3).await;

        assert!(
            matches!(
                result,
                Err(ProductsServiceError::InsufficientStock { available: 2 })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        assert_eq!(ctx.products.get_product(product.uuid).await?.quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_decrements_never_oversell() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(100, 1).await;

        let (first, second) = tokio::join!(
            ctx.products.decrement_stock(product.uuid, 1),
            ctx.products.decrement_stock(product.uuid, 1),
        );

        assert_eq!(
            usize::from(first.is_ok()) + usize::from(second.is_ok()),
            1,
            "exactly one decrement should win: {first:?} {second:?}"
        );

        assert_eq!(ctx.products.get_product(product.uuid).await?.quantity, 0);

        Ok(())
    }

    #[tokio::test]
    async fn decrement_stock_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.decrement_stock(ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
