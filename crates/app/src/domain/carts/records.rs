//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{
        products::records::{ProductUuid, ProductVariant},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub total: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// CartItem Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,

    /// Unit price captured when the line was first added, variants included.
    pub price: u64,

    /// Chosen options, sorted by name then value.
    pub selected_variants: Vec<ProductVariant>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItemRecord {
    /// `price × quantity`, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.quantity))
    }
}

/// A user's cart together with its lines.
///
/// Users who have never added anything get an empty view with no `uuid`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub uuid: Option<CartUuid>,
    pub user_uuid: UserUuid,
    pub total: u64,
    pub items: Vec<CartItemRecord>,
    pub updated_at: Option<Timestamp>,
}

impl Cart {
    #[must_use]
    pub fn empty(user: UserUuid) -> Self {
        Self {
            uuid: None,
            user_uuid: user,
            total: 0,
            items: Vec::new(),
            updated_at: None,
        }
    }

    #[must_use]
    pub fn from_parts(cart: CartRecord, items: Vec<CartItemRecord>) -> Self {
        Self {
            uuid: Some(cart.uuid),
            user_uuid: cart.user_uuid,
            total: cart.total,
            items,
            updated_at: Some(cart.updated_at),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
