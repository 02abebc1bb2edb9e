//! Cart Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_app::domain::{
    carts::{
        data::{MAX_LINE_QUANTITY, NewCartItem, VariantChoice},
        records::{Cart, CartItemRecord},
    },
    products::records::ProductUuid,
};

use crate::products::models::VariantModel;

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart, absent until the first item is added
    pub uuid: Option<Uuid>,

    /// The lines in the cart, oldest first
    pub items: Vec<CartItemResponse>,

    /// Sum of every line total, in minor units
    pub total: u64,

    /// The date and time the cart was last changed
    pub updated_at: Option<String>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            uuid: cart.uuid.map(|uuid| uuid.into_uuid()),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total: cart.total,
            updated_at: cart.updated_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart line
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub quantity: u32,

    /// Unit price captured when the line was first added, options included
    pub price: u64,

    /// `price × quantity`
    pub line_total: u64,

    /// Chosen options with the prices they added
    pub selected_variants: Vec<VariantModel>,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            quantity: item.quantity,
            price: item.price,
            line_total: item.price.saturating_mul(u64::from(item.quantity)),
            selected_variants: item
                .selected_variants
                .into_iter()
                .map(VariantModel::from)
                .collect(),
        }
    }
}

/// A chosen product option. Its price always comes from the catalog.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantChoiceRequest {
    pub name: String,
    pub value: String,
}

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    pub product_uuid: Uuid,

    /// Units to add, between 1 and 10
    pub quantity: i64,

    #[serde(default)]
    pub selected_variants: Vec<VariantChoiceRequest>,
}

impl TryFrom<AddCartItemRequest> for NewCartItem {
    type Error = Vec<String>;

    fn try_from(request: AddCartItemRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            product_uuid: ProductUuid::from_uuid(request.product_uuid),
            quantity: line_quantity(request.quantity).map_err(|problem| vec![problem])?,
            selected_variants: request
                .selected_variants
                .into_iter()
                .map(|choice| VariantChoice {
                    name: choice.name,
                    value: choice.value,
                })
                .collect(),
        })
    }
}

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity, between 1 and 10. Remove the line to drop it.
    pub quantity: i64,
}

impl UpdateCartItemRequest {
    /// The requested quantity, when it fits a cart line at all. The 1 to 10 bound itself
    /// is enforced by the cart.
    pub(crate) fn quantity(&self) -> Result<u32, Vec<String>> {
        line_quantity(self.quantity).map_err(|problem| vec![problem])
    }
}

fn line_quantity(quantity: i64) -> Result<u32, String> {
    u32::try_from(quantity).ok().ok_or_else(|| {
        format!("quantity must be between 1 and {MAX_LINE_QUANTITY}, got {quantity}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_oversized_quantities_are_rejected() {
        assert_eq!(
            line_quantity(-1),
            Err("quantity must be between 1 and 10, got -1".to_string())
        );
        assert!(line_quantity(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn zero_passes_through_to_the_cart() {
        assert_eq!(line_quantity(0), Ok(0));
        assert_eq!(line_quantity(3), Ok(3));
    }
}
