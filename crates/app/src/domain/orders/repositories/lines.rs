//! Order Lines Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};
use uuid::Uuid;

use crate::{
    database::{amount_to_db, count_to_db, try_get_amount, try_get_count},
    domain::{
        orders::records::{OrderLineRecord, OrderLineUuid, OrderUuid},
        products::records::{ProductUuid, ProductVariant},
    },
};

const CREATE_ORDER_LINE_SQL: &str = include_str!("../sql/create_order_line.sql");
const LIST_ORDER_LINES_SQL: &str = include_str!("../sql/list_order_lines.sql");

/// Snapshot values for one purchased line.
#[derive(Debug)]
pub(crate) struct OrderLine<'a> {
    pub(crate) position: u32,
    pub(crate) product: ProductUuid,
    pub(crate) name: &'a str,
    pub(crate) image_url: Option<&'a str>,
    pub(crate) price: u64,
    pub(crate) quantity: u32,
    pub(crate) selected_variants: &'a [ProductVariant],
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderLinesRepository;

impl PgOrderLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        line: OrderLine<'_>,
    ) -> Result<OrderLineRecord, sqlx::Error> {
        query_as::<Postgres, OrderLineRecord>(CREATE_ORDER_LINE_SQL)
            .bind(OrderLineUuid::new())
            .bind(order)
            .bind(count_to_db(line.position, "position")?)
            .bind(line.product)
            .bind(line.name)
            .bind(line.image_url)
            .bind(amount_to_db(line.price, "price")?)
            .bind(count_to_db(line.quantity, "quantity")?)
            .bind(Json(line.selected_variants))
            .fetch_one(&mut **tx)
            .await
    }

    /// Lines of every given order, grouped by order and in checkout order within each.
    pub(crate) async fn list_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderLineRecord>, sqlx::Error> {
        let orders: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        query_as::<Postgres, OrderLineRecord>(LIST_ORDER_LINES_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(selected_variants) =
            row.try_get::<Json<Vec<ProductVariant>>, _>("selected_variants")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            order_uuid: row.try_get("order_uuid")?,
            position: try_get_count(row, "position")?,
            product_uuid: row.try_get("product_uuid")?,
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            price: try_get_amount(row, "price")?,
            quantity: try_get_count(row, "quantity")?,
            selected_variants,
        })
    }
}
