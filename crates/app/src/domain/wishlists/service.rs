//! Wishlists service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
        wishlists::{errors::WishlistsServiceError, repository::PgWishlistsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgWishlistsService {
    db: Db,
    repository: PgWishlistsRepository,
    products_repository: PgProductsRepository,
}

impl PgWishlistsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgWishlistsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl WishlistsService for PgWishlistsService {
    async fn list_wishlist(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ProductRecord>, WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, user).await?;

        tx.commit().await?;

        Ok(products)
    }

    #[tracing::instrument(
        name = "wishlists.service.add_to_wishlist",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn add_to_wishlist(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Vec<ProductRecord>, WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        self.products_repository
            .find_product(&mut tx, product)
            .await?
            .ok_or(WishlistsServiceError::ProductNotFound)?;

        let added = self.repository.add_product(&mut tx, user, product).await?;

        debug!(added, "wishlist entry saved");

        let products = self.repository.list_products(&mut tx, user).await?;

        tx.commit().await?;

        Ok(products)
    }

    #[tracing::instrument(
        name = "wishlists.service.remove_from_wishlist",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn remove_from_wishlist(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Vec<ProductRecord>, WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.remove_product(&mut tx, user, product).await?;

        let products = self.repository.list_products(&mut tx, user).await?;

        tx.commit().await?;

        Ok(products)
    }
}

#[automock]
#[async_trait]
pub trait WishlistsService: Send + Sync {
    /// Retrieve the live products a user has saved.
    async fn list_wishlist(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ProductRecord>, WishlistsServiceError>;

    /// Save a product. Saving it again changes nothing.
    async fn add_to_wishlist(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Vec<ProductRecord>, WishlistsServiceError>;

    /// Forget a product. Forgetting one that was never saved changes nothing.
    async fn remove_from_wishlist(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Vec<ProductRecord>, WishlistsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{products::ProductsService, users::records::Role},
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn adding_twice_keeps_a_single_entry() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Student).await;
        let product = ctx.create_product(100, 1).await;

        ctx.wishlists.add_to_wishlist(user, product.uuid).await?;
        let wishlist = ctx.wishlists.add_to_wishlist(user, product.uuid).await?;

        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.first().map(|p| p.uuid), Some(product.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_returns_product_not_found() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Student).await;

        let result = ctx.wishlists.add_to_wishlist(user, ProductUuid::new()).await;

        assert!(
            matches!(result, Err(WishlistsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn removing_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Student).await;
        let product = ctx.create_product(100, 1).await;

        ctx.wishlists.add_to_wishlist(user, product.uuid).await?;

        let first = ctx.wishlists.remove_from_wishlist(user, product.uuid).await?;
        let second = ctx.wishlists.remove_from_wishlist(user, product.uuid).await?;

        assert!(first.is_empty());
        assert!(second.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn deleted_products_drop_out_of_wishlists() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Student).await;
        let kept = ctx.create_product(100, 1).await;
        let deleted = ctx.create_product(200, 1).await;

        ctx.wishlists.add_to_wishlist(user, kept.uuid).await?;
        ctx.wishlists.add_to_wishlist(user, deleted.uuid).await?;

        ctx.products.delete_product(deleted.uuid).await?;

        let wishlist = ctx.wishlists.list_wishlist(user).await?;

        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.first().map(|p| p.uuid), Some(kept.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn wishlists_are_per_user() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user(Role::Student).await;
        let other = ctx.create_user(Role::Student).await;
        let product = ctx.create_product(100, 1).await;

        ctx.wishlists.add_to_wishlist(owner, product.uuid).await?;

        assert!(ctx.wishlists.list_wishlist(other).await?.is_empty());

        Ok(())
    }
}
