//! Order Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_app::domain::orders::{
    data::{CheckoutPayload, OrderStatusUpdate},
    records::{OrderConfirmation, OrderLineRecord, OrderRecord, ShippingAddress},
    status::{OrderStatus, PaymentStatus},
};

use crate::products::models::VariantModel;

/// Delivery address. Missing fields are reported together as validation failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct ShippingAddressModel {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl From<ShippingAddressModel> for ShippingAddress {
    fn from(address: ShippingAddressModel) -> Self {
        Self {
            full_name: address.full_name,
            phone: address.phone,
            line1: address.line1,
            line2: address.line2.filter(|line| !line.trim().is_empty()),
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressModel {
    fn from(address: ShippingAddress) -> Self {
        Self {
            full_name: address.full_name,
            phone: address.phone,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// Checkout Request
///
/// Amounts are the totals the client displayed. They are checked against the cart and
/// never used to price the order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    #[serde(default)]
    pub shipping_address: ShippingAddressModel,

    /// One of `cash_on_delivery`, `card`, `upi` or `net_banking`
    #[serde(default)]
    pub payment_method: String,

    /// Cart subtotal in minor units, never negative
    pub subtotal: i64,

    #[serde(default)]
    pub tax: i64,

    #[serde(default)]
    pub shipping: i64,

    /// `subtotal + tax + shipping`
    pub total_amount: i64,

    pub notes: Option<String>,
}

impl TryFrom<CheckoutRequest> for CheckoutPayload {
    type Error = Vec<String>;

    fn try_from(request: CheckoutRequest) -> Result<Self, Self::Error> {
        let subtotal = minor_units("subtotal", request.subtotal);
        let tax = minor_units("tax", request.tax);
        let shipping = minor_units("shipping", request.shipping);
        let total_amount = minor_units("total_amount", request.total_amount);

        match (subtotal, tax, shipping, total_amount) {
            (Ok(subtotal), Ok(tax), Ok(shipping), Ok(total_amount)) => Ok(Self {
                shipping_address: request.shipping_address.into(),
                payment_method: request.payment_method,
                subtotal,
                tax,
                shipping,
                total_amount,
                notes: request.notes.filter(|notes| !notes.trim().is_empty()),
            }),
            (subtotal, tax, shipping, total_amount) => Err([
                subtotal.err(),
                tax.err(),
                shipping.err(),
                total_amount.err(),
            ]
            .into_iter()
            .flatten()
            .collect()),
        }
    }
}

fn minor_units(field: &str, amount: i64) -> Result<u64, String> {
    u64::try_from(amount)
        .ok()
        .ok_or_else(|| format!("{field} must not be negative, got {amount}"))
}

/// Order Confirmation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderConfirmationResponse {
    pub order_uuid: Uuid,

    /// Human-facing reference, such as `ORD-20261018-7K3QHM2P`
    pub order_number: String,

    /// Server-computed total in minor units
    pub total_amount: u64,

    pub status: String,
}

impl From<OrderConfirmation> for OrderConfirmationResponse {
    fn from(confirmation: OrderConfirmation) -> Self {
        Self {
            order_uuid: confirmation.order_uuid.into_uuid(),
            order_number: confirmation.order_number,
            total_amount: confirmation.total_amount,
            status: confirmation.status.to_string(),
        }
    }
}

/// A purchased product as it was at checkout
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub name: String,
    pub image_url: Option<String>,

    /// Unit price paid, options included
    pub price: u64,

    pub quantity: u32,
    pub line_total: u64,
    pub selected_variants: Vec<VariantModel>,
}

impl From<OrderLineRecord> for OrderLineResponse {
    fn from(line: OrderLineRecord) -> Self {
        Self {
            uuid: line.uuid.into_uuid(),
            product_uuid: line.product_uuid.into_uuid(),
            line_total: line.line_total().unwrap_or(u64::MAX),
            name: line.name,
            image_url: line.image_url,
            price: line.price,
            quantity: line.quantity,
            selected_variants: line
                .selected_variants
                .into_iter()
                .map(VariantModel::from)
                .collect(),
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub order_number: String,
    pub user_uuid: Uuid,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,
    pub shipping_address: ShippingAddressModel,
    pub payment_method: String,

    /// Fulfilment state
    pub status: String,

    pub payment_status: String,
    pub notes: Option<String>,
    pub lines: Vec<OrderLineResponse>,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order was last changed
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            order_number: order.order_number,
            user_uuid: order.user_uuid.into_uuid(),
            subtotal: order.subtotal,
            tax: order.tax,
            shipping: order.shipping,
            total: order.total,
            shipping_address: order.shipping_address.into(),
            payment_method: order.payment_method.to_string(),
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            notes: order.notes,
            lines: order.lines.into_iter().map(OrderLineResponse::from).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
}

impl From<Vec<OrderRecord>> for OrdersResponse {
    fn from(orders: Vec<OrderRecord>) -> Self {
        Self {
            orders: orders.into_iter().map(OrderResponse::from).collect(),
        }
    }
}

/// Order Status Update Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderStatusUpdateRequest {
    /// One of `pending`, `confirmed`, `processing`, `shipped`, `delivered` or `cancelled`
    pub status: String,

    /// One of `pending`, `paid`, `failed` or `refunded`; unchanged when absent
    pub payment_status: Option<String>,

    /// Replaces the order notes when present
    pub notes: Option<String>,
}

impl TryFrom<OrderStatusUpdateRequest> for OrderStatusUpdate {
    type Error = Vec<String>;

    fn try_from(request: OrderStatusUpdateRequest) -> Result<Self, Self::Error> {
        let status = request.status.parse::<OrderStatus>();

        let payment_status = request
            .payment_status
            .as_deref()
            .map(str::parse::<PaymentStatus>)
            .transpose();

        match (status, payment_status) {
            (Ok(status), Ok(payment_status)) => Ok(Self {
                status,
                payment_status,
                notes: request.notes,
            }),
            (status, payment_status) => Err(status
                .err()
                .map(|error| error.to_string())
                .into_iter()
                .chain(payment_status.err().map(|error| error.to_string()))
                .collect()),
        }
    }
}
