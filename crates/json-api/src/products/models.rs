//! Product Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_app::domain::{
    categories::records::CategoryUuid,
    products::{
        data::ProductDetails,
        records::{ProductRecord, ProductVariant},
    },
};

/// A purchasable product option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantModel {
    /// Option name, such as `size`
    pub name: String,

    /// Option value, such as `XL`
    pub value: String,

    /// Amount added to the base price when selected, in minor units
    #[serde(default)]
    pub price: u64,
}

impl From<ProductVariant> for VariantModel {
    fn from(variant: ProductVariant) -> Self {
        Self {
            name: variant.name,
            value: variant.value,
            price: variant.price,
        }
    }
}

impl From<VariantModel> for ProductVariant {
    fn from(variant: VariantModel) -> Self {
        Self {
            name: variant.name,
            value: variant.value,
            price: variant.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// The category the product is listed under
    pub category_uuid: Option<Uuid>,

    pub name: String,

    pub description: Option<String>,

    /// Base price in minor units
    pub price: u64,

    /// Units in stock
    pub quantity: u32,

    /// Whether the product is on sale
    pub active: bool,

    pub image_url: Option<String>,

    pub variants: Vec<VariantModel>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            uuid: product.uuid.into_uuid(),
            category_uuid: product.category_uuid.map(CategoryUuid::into_uuid),
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            active: product.active,
            image_url: product.image_url,
            variants: product.variants.into_iter().map(Into::into).collect(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

impl From<Vec<ProductRecord>> for ProductsResponse {
    fn from(products: Vec<ProductRecord>) -> Self {
        Self {
            products: products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Product fields accepted on create and on full update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    pub category_uuid: Option<Uuid>,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Base price in minor units
    pub price: u64,

    /// Units in stock
    pub quantity: u32,

    /// Whether the product is on sale, defaults to `true`
    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub variants: Vec<VariantModel>,
}

fn default_active() -> bool {
    true
}

impl From<ProductRequest> for ProductDetails {
    fn from(request: ProductRequest) -> Self {
        Self {
            category_uuid: request.category_uuid.map(CategoryUuid::from_uuid),
            name: request.name,
            description: request.description.filter(|text| !text.trim().is_empty()),
            price: request.price,
            quantity: request.quantity,
            active: request.active,
            image_url: request.image_url.filter(|url| !url.trim().is_empty()),
            variants: request.variants.into_iter().map(Into::into).collect(),
        }
    }
}
