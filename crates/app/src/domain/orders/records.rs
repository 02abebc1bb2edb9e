//! Order Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        orders::status::{OrderStatus, PaymentMethod, PaymentStatus},
        products::records::{ProductUuid, ProductVariant},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLineRecord>;

/// Where an order is delivered. Stored with the order as it was entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub lines: Vec<OrderLineRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A purchased product, frozen at checkout.
///
/// Later catalog edits or deletions never change these values.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineRecord {
    pub uuid: OrderLineUuid,
    pub order_uuid: OrderUuid,
    pub position: u32,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub image_url: Option<String>,
    pub price: u64,
    pub quantity: u32,
    pub selected_variants: Vec<ProductVariant>,
}

impl OrderLineRecord {
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.quantity))
    }
}

/// What checkout hands back to the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_uuid: OrderUuid,
    pub order_number: String,
    pub total_amount: u64,
    pub status: OrderStatus,
}

impl From<&OrderRecord> for OrderConfirmation {
    fn from(order: &OrderRecord) -> Self {
        Self {
            order_uuid: order.uuid,
            order_number: order.order_number.clone(),
            total_amount: order.total,
            status: order.status,
        }
    }
}
