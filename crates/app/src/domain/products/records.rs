//! Product Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{domain::categories::records::CategoryUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// A purchasable option of a product, such as a size or colour.
///
/// `price` is added to the product's base price when the option is selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductVariant {
    pub name: String,
    pub value: String,
    pub price: u64,
}

impl ProductVariant {
    #[must_use]
    pub fn is(&self, name: &str, value: &str) -> bool {
        self.name == name && self.value == value
    }
}

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub category_uuid: Option<CategoryUuid>,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub quantity: u32,
    pub active: bool,
    pub image_url: Option<String>,
    pub variants: Vec<ProductVariant>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Whether the product may be put in a cart or ordered, ignoring stock.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }

    /// Find one of this product's variants by name and value.
    #[must_use]
    pub fn variant(&self, name: &str, value: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|variant| variant.is(name, value))
    }
}
