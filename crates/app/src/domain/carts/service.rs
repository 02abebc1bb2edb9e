//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, debug};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{
                MAX_LINE_QUANTITY, NewCartItem, demand_by_product, quantity_problem,
                resolve_variants, unit_price,
            },
            errors::CartsServiceError,
            records::{Cart, CartItemUuid, CartRecord},
            repositories::{CartLine, PgCartItemsRepository, PgCartsRepository},
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn refreshed_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &CartRecord,
    ) -> Result<Cart, CartsServiceError> {
        let cart = self.carts_repository.recompute_total(tx, cart.uuid).await?;
        let items = self.items_repository.list_items(tx, cart.uuid).await?;

        Ok(Cart::from_parts(cart, items))
    }
}

fn ensure_stock(product: &ProductRecord, requested: u32) -> Result<(), CartsServiceError> {
    if requested > product.quantity {
        return Err(CartsServiceError::InsufficientStock {
            product: product.uuid,
            requested,
            available: product.quantity,
        });
    }

    Ok(())
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(cart) = self.carts_repository.find_cart(&mut tx, user).await? else {
            tx.commit().await?;

            return Ok(Cart::empty(user));
        };

        let items = self.items_repository.list_items(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(Cart::from_parts(cart, items))
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product_uuid,
            quantity = item.quantity,
            cart_item_uuid = tracing::field::Empty,
            merged = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(&self, user: UserUuid, item: NewCartItem) -> Result<Cart, CartsServiceError> {
        if let Some(problem) = quantity_problem(item.quantity) {
            return Err(CartsServiceError::ValidationFailed(vec![problem]));
        }

        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        let product = self
            .products_repository
            .find_product(&mut tx, item.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        if !product.is_purchasable() {
            return Err(CartsServiceError::Unavailable(product.uuid));
        }

        let selected = resolve_variants(&product, &item.selected_variants)
            .map_err(CartsServiceError::ValidationFailed)?;

        let items = self.items_repository.list_items(&mut tx, cart.uuid).await?;

        let existing = items
            .iter()
            .find(|line| line.product_uuid == product.uuid && line.selected_variants == selected);

        let line_quantity = existing
            .map_or(0, |line| line.quantity)
            .saturating_add(item.quantity);

        if line_quantity > MAX_LINE_QUANTITY {
            return Err(CartsServiceError::ValidationFailed(vec![format!(
                "a cart line may hold at most {MAX_LINE_QUANTITY} units, this one would hold {line_quantity}"
            )]));
        }

        // Stock has to cover every line of this product, whatever its options.
        let held_elsewhere = demand_by_product(&items, existing.map(|line| line.uuid))
            .get(&product.uuid)
            .copied()
            .unwrap_or(0);

        ensure_stock(&product, held_elsewhere.saturating_add(line_quantity))?;

        let line = match existing {
            Some(line) => {
                self.items_repository
                    .update_quantity(&mut tx, cart.uuid, line.uuid, line_quantity)
                    .await?
            }
            None => {
                let price = unit_price(&product, &selected).ok_or_else(|| {
                    CartsServiceError::ValidationFailed(vec!["unit price is too large".to_string()])
                })?;

                self.items_repository
                    .create_item(
                        &mut tx,
                        cart.uuid,
                        CartLine {
                            product: product.uuid,
                            quantity: item.quantity,
                            price,
                            selected_variants: &selected,
                        },
                    )
                    .await?
            }
        };

        Span::current().record("cart_item_uuid", tracing::field::display(line.uuid));
        Span::current().record("merged", existing.is_some());

        let cart = self.refreshed_cart(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.update_item_quantity",
        skip(self),
        fields(user_uuid = %user, cart_item_uuid = %item),
        err
    )]
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if let Some(problem) = quantity_problem(quantity) {
            return Err(CartsServiceError::ValidationFailed(vec![problem]));
        }

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let line = self
            .items_repository
            .find_item(&mut tx, cart.uuid, item)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let product = self
            .products_repository
            .find_product(&mut tx, line.product_uuid)
            .await?
            .filter(ProductRecord::is_purchasable)
            .ok_or(CartsServiceError::Unavailable(line.product_uuid))?;

        let items = self.items_repository.list_items(&mut tx, cart.uuid).await?;

        let held_elsewhere = demand_by_product(&items, Some(line.uuid))
            .get(&product.uuid)
            .copied()
            .unwrap_or(0);

        ensure_stock(&product, held_elsewhere.saturating_add(quantity))?;

        self.items_repository
            .update_quantity(&mut tx, cart.uuid, line.uuid, quantity)
            .await?;

        let cart = self.refreshed_cart(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, cart_item_uuid = %item, removed = tracing::field::Empty),
        err
    )]
    async fn remove_item(&self, user: UserUuid, item: CartItemUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(cart) = self.carts_repository.lock_cart(&mut tx, user).await? else {
            tx.commit().await?;

            return Ok(Cart::empty(user));
        };

        let rows_affected = self
            .items_repository
            .delete_item(&mut tx, cart.uuid, item)
            .await?;

        Span::current().record("removed", rows_affected > 0);

        if rows_affected == 0 {
            debug!("cart item already absent");
        }

        let cart = self.refreshed_cart(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn clear_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        self.items_repository.delete_items(&mut tx, cart.uuid).await?;

        let cart = self.refreshed_cart(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.validate_cart",
        skip(self),
        fields(user_uuid = %user, problems = tracing::field::Empty),
        err
    )]
    async fn validate_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(record) = self.carts_repository.find_cart(&mut tx, user).await? else {
            return Err(CartsServiceError::ValidationFailed(vec![
                "cart is empty".to_string(),
            ]));
        };

        let items = self.items_repository.list_items(&mut tx, record.uuid).await?;

        if items.is_empty() {
            return Err(CartsServiceError::ValidationFailed(vec![
                "cart is empty".to_string(),
            ]));
        }

        let mut problems = Vec::new();
        let mut checked: Vec<ProductUuid> = Vec::with_capacity(items.len());
        let demand = demand_by_product(&items, None);

        for line in &items {
            if checked.contains(&line.product_uuid) {
                continue;
            }

            checked.push(line.product_uuid);

            let product = self
                .products_repository
                .find_product(&mut tx, line.product_uuid)
                .await?;

            let Some(product) = product else {
                problems.push(format!("product {} no longer exists", line.product_uuid));
                continue;
            };

            if !product.active {
                problems.push(format!("{} is not available", product.name));
                continue;
            }

            let requested = demand.get(&product.uuid).copied().unwrap_or(0);

            if requested > product.quantity {
                problems.push(format!(
                    "only {} of {} left, {requested} requested",
                    product.quantity, product.name
                ));
            }
        }

        tx.commit().await?;

        if !problems.is_empty() {
            Span::current().record("problems", problems.len());

            return Err(CartsServiceError::ValidationFailed(problems));
        }

        Ok(Cart::from_parts(record, items))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart; users without one get an empty view.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add a product to the user's cart, merging with an identical line when present.
    async fn add_item(&self, user: UserUuid, item: NewCartItem) -> Result<Cart, CartsServiceError>;

    /// Set the quantity of one line.
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove one line. Removing an absent line succeeds without change.
    async fn remove_item(&self, user: UserUuid, item: CartItemUuid) -> Result<Cart, CartsServiceError>;

    /// Remove every line from the user's cart.
    async fn clear_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Re-check every line against the live catalog, reporting all problems at once.
    async fn validate_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;
}
