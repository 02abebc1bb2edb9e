//! Orders Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::{
    database::{amount_to_db, try_get_amount},
    domain::{
        orders::{
            data::{OrderFilter, OrderStatusUpdate},
            records::{OrderRecord, OrderUuid, ShippingAddress},
            status::PaymentMethod,
        },
        users::records::UserUuid,
    },
};

const INSERT_ORDER_SQL: &str = include_str!("../sql/insert_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const GET_USER_ORDER_SQL: &str = include_str!("../sql/get_user_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");

/// Values for the order header written at checkout.
#[derive(Debug)]
pub(crate) struct NewOrderRow<'a> {
    pub(crate) user: UserUuid,
    pub(crate) subtotal: u64,
    pub(crate) tax: u64,
    pub(crate) shipping: u64,
    pub(crate) total: u64,
    pub(crate) shipping_address: &'a ShippingAddress,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) notes: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert an order header, returning `None` when its order number is taken.
    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_number: &str,
        row: &NewOrderRow<'_>,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(INSERT_ORDER_SQL)
            .bind(OrderUuid::new())
            .bind(order_number)
            .bind(row.user)
            .bind(amount_to_db(row.subtotal, "subtotal")?)
            .bind(amount_to_db(row.tax, "tax")?)
            .bind(amount_to_db(row.shipping, "shipping")?)
            .bind(amount_to_db(row.total, "total")?)
            .bind(Json(row.shipping_address))
            .bind(row.payment_method.as_str())
            .bind(row.notes)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_user_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_USER_ORDER_SQL)
            .bind(order)
            .bind(user)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrderFilter,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.status.map(|status| status.as_str()))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &OrderStatusUpdate,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order)
            .bind(update.status.as_str())
            .bind(update.payment_status.map(|status| status.as_str()))
            .bind(update.notes.as_deref())
            .fetch_optional(&mut **tx)
            .await
    }
}

fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.try_get(col)?;

    text.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(shipping_address) = row.try_get::<Json<ShippingAddress>, _>("shipping_address")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            order_number: row.try_get("order_number")?,
            user_uuid: row.try_get("user_uuid")?,
            subtotal: try_get_amount(row, "subtotal")?,
            tax: try_get_amount(row, "tax")?,
            shipping: try_get_amount(row, "shipping")?,
            total: try_get_amount(row, "total")?,
            shipping_address,
            payment_method: try_get_parsed(row, "payment_method")?,
            status: try_get_parsed(row, "status")?,
            payment_status: try_get_parsed(row, "payment_status")?,
            notes: row.try_get("notes")?,
            lines: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
