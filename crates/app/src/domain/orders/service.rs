//! Orders service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use sqlx::{Postgres, Transaction};
use tracing::{Span, debug, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::demand_by_product,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        orders::{
            data::{CheckoutPayload, CheckoutPolicy, OrderFilter, OrderStatusUpdate},
            errors::OrdersServiceError,
            numbers::{OrderNumberGenerator, RandomOrderNumbers},
            records::{OrderConfirmation, OrderRecord, OrderUuid},
            repositories::{NewOrderRow, OrderLine, PgOrderLinesRepository, PgOrdersRepository},
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    policy: CheckoutPolicy,
    order_numbers: Arc<dyn OrderNumberGenerator>,
    orders_repository: PgOrdersRepository,
    lines_repository: PgOrderLinesRepository,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl Debug for PgOrdersService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, policy: CheckoutPolicy) -> Self {
        Self::with_order_numbers(db, policy, Arc::new(RandomOrderNumbers))
    }

    #[must_use]
    pub fn with_order_numbers(
        db: Db,
        policy: CheckoutPolicy,
        order_numbers: Arc<dyn OrderNumberGenerator>,
    ) -> Self {
        Self {
            db,
            policy,
            order_numbers,
            orders_repository: PgOrdersRepository::new(),
            lines_repository: PgOrderLinesRepository::new(),
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Insert the order header, drawing fresh order numbers until one is free.
    async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        row: &NewOrderRow<'_>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let attempts = self.policy.order_number_attempts;

        for attempt in 1..=attempts {
            let order_number = self.order_numbers.generate(Timestamp::now());

            if let Some(order) = self
                .orders_repository
                .insert_order(tx, &order_number, row)
                .await?
            {
                return Ok(order);
            }

            warn!(attempt, order_number = %order_number, "order number already taken");
        }

        Err(OrdersServiceError::OrderNumberExhausted { attempts })
    }

    /// Fill in the lines of every order.
    async fn with_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut orders: Vec<OrderRecord>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        if orders.is_empty() {
            return Ok(orders);
        }

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut lines_by_order: FxHashMap<OrderUuid, Vec<_>> = FxHashMap::default();

        for line in self.lines_repository.list_lines(tx, &uuids).await? {
            lines_by_order.entry(line.order_uuid).or_default().push(line);
        }

        for order in &mut orders {
            order.lines = lines_by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn single_with_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Option<OrderRecord>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let order = order.ok_or(OrdersServiceError::NotFound)?;

        self.with_lines(tx, vec![order])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, payload),
        fields(
            user_uuid = %user,
            order_uuid = tracing::field::Empty,
            order_number = tracing::field::Empty,
            lines = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(
        &self,
        user: UserUuid,
        payload: CheckoutPayload,
    ) -> Result<OrderConfirmation, OrdersServiceError> {
        let payment_method = payload
            .validate()
            .map_err(OrdersServiceError::ValidationFailed)?;

        let mut tx = self.db.begin().await?;

        let empty_cart = || OrdersServiceError::ValidationFailed(vec!["cart is empty".to_string()]);

        let cart = self
            .carts_repository
            .lock_cart(&mut tx, user)
            .await?
            .ok_or_else(empty_cart)?;

        let items = self.items_repository.list_items(&mut tx, cart.uuid).await?;

        if items.is_empty() {
            return Err(empty_cart());
        }

        Span::current().record("lines", items.len());

        let subtotal = items
            .iter()
            .try_fold(0_u64, |sum, item| item.line_total().and_then(|t| sum.checked_add(t)))
            .ok_or_else(|| {
                OrdersServiceError::ValidationFailed(vec!["order total is too large".to_string()])
            })?;

        let total = payload
            .reconcile(subtotal, self.policy.total_tolerance)
            .map_err(OrdersServiceError::ValidationFailed)?;

        let demand = demand_by_product(&items, None);

        let mut products: FxHashMap<ProductUuid, ProductRecord> = FxHashMap::default();

        for item in &items {
            if products.contains_key(&item.product_uuid) {
                continue;
            }

            let product = self
                .products_repository
                .find_product(&mut tx, item.product_uuid)
                .await?
                .filter(ProductRecord::is_purchasable)
                .ok_or(OrdersServiceError::ProductUnavailable(item.product_uuid))?;

            let requested = demand.get(&product.uuid).copied().unwrap_or(item.quantity);

            if requested > product.quantity {
                return Err(OrdersServiceError::InsufficientStock {
                    product: product.uuid,
                    requested,
                    available: product.quantity,
                });
            }

            products.insert(product.uuid, product);
        }

        let mut order = self
            .insert_order(
                &mut tx,
                &NewOrderRow {
                    user,
                    subtotal,
                    tax: payload.tax,
                    shipping: payload.shipping,
                    total,
                    shipping_address: &payload.shipping_address,
                    payment_method,
                    notes: payload.notes.as_deref(),
                },
            )
            .await?;

        Span::current().record("order_uuid", tracing::field::display(order.uuid));
        Span::current().record("order_number", order.order_number.as_str());

        for (position, item) in (0_u32..).zip(&items) {
            let product = products
                .get(&item.product_uuid)
                .ok_or(OrdersServiceError::ProductUnavailable(item.product_uuid))?;

            let line = self
                .lines_repository
                .create_line(
                    &mut tx,
                    order.uuid,
                    OrderLine {
                        position,
                        product: product.uuid,
                        name: &product.name,
                        image_url: product.image_url.as_deref(),
                        price: item.price,
                        quantity: item.quantity,
                        selected_variants: &item.selected_variants,
                    },
                )
                .await?;

            order.lines.push(line);
        }

        let mut decrements: SmallVec<[(ProductUuid, u32); 8]> = demand.into_iter().collect();

        decrements.sort_unstable_by_key(|(product, _)| *product);

        for (product, amount) in decrements {
            let decremented = self
                .products_repository
                .decrement_stock(&mut tx, product, amount)
                .await?;

            if decremented.is_none() {
                let available = self
                    .products_repository
                    .find_product(&mut tx, product)
                    .await?
                    .map_or(0, |current| current.quantity);

                return Err(OrdersServiceError::InsufficientStock {
                    product,
                    requested: amount,
                    available,
                });
            }
        }

        let cleared = self.items_repository.delete_items(&mut tx, cart.uuid).await?;

        self.carts_repository.recompute_total(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        debug!(cleared, total, "checkout committed");

        Ok(OrderConfirmation::from(&order))
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.orders_repository.find_order(&mut tx, order).await?;
        let order = self.single_with_lines(&mut tx, found).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn get_order_for_user(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self
            .orders_repository
            .find_user_order(&mut tx, user, order)
            .await?;
        let order = self.single_with_lines(&mut tx, found).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_user_orders(&mut tx, user).await?;
        let orders = self.with_lines(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_orders(&mut tx, filter).await?;
        let orders = self.with_lines(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_order_status",
        skip(self, update),
        fields(
            order_uuid = %order,
            status = %update.status,
            previous_status = tracing::field::Empty
        ),
        err
    )]
    async fn update_order_status(
        &self,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let previous = self
            .orders_repository
            .find_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?
            .status;

        Span::current().record("previous_status", tracing::field::display(previous));

        if previous.is_terminal() && previous != update.status {
            warn!(
                from = %previous,
                to = %update.status,
                "order moved out of a final state"
            );
        }

        let updated = self
            .orders_repository
            .update_status(&mut tx, order, &update)
            .await?;
        let order = self.single_with_lines(&mut tx, updated).await?;

        tx.commit().await?;

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the user's cart into a pending order.
    ///
    /// Stock is taken and the cart emptied in the same transaction as the order is
    /// written, so either all of it happens or none of it does.
    async fn create_order(
        &self,
        user: UserUuid,
        payload: CheckoutPayload,
    ) -> Result<OrderConfirmation, OrdersServiceError>;

    /// Retrieve any order with its lines.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve an order the user placed. Other users' orders read as absent.
    async fn get_order_for_user(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve the user's orders, newest first.
    async fn list_orders_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve every order, newest first.
    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Set the fulfilment state and optionally the payment state and notes.
    async fn update_order_status(
        &self,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
