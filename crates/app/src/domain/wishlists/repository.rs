//! Wishlists Repository

use sqlx::{Postgres, Transaction, query, query_as};

use crate::domain::{
    products::records::{ProductRecord, ProductUuid},
    users::records::UserUuid,
};

const LIST_WISHLIST_SQL: &str = include_str!("sql/list_wishlist.sql");
const ADD_WISHLIST_ITEM_SQL: &str = include_str!("sql/add_wishlist_item.sql");
const REMOVE_WISHLIST_ITEM_SQL: &str = include_str!("sql/remove_wishlist_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWishlistsRepository;

impl PgWishlistsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Live products on the user's wishlist, most recently added first.
    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_WISHLIST_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn add_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(ADD_WISHLIST_ITEM_SQL)
            .bind(user)
            .bind(product)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn remove_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REMOVE_WISHLIST_ITEM_SQL)
            .bind(user)
            .bind(product)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
