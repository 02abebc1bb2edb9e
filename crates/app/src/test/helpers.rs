//! Test Helpers

use uuid::Uuid;

use crate::domain::{
    carts::data::NewCartItem,
    products::{data::ProductDetails, records::ProductUuid},
};

pub(crate) fn unique_email() -> String {
    format!("student-{}@campus.test", Uuid::now_v7().simple())
}

pub(crate) fn product_details(price: u64, quantity: u32) -> ProductDetails {
    ProductDetails {
        category_uuid: None,
        name: "Campus Hoodie".to_string(),
        description: Some("Heavyweight fleece with embroidered crest".to_string()),
        price,
        quantity,
        active: true,
        image_url: None,
        variants: Vec::new(),
    }
}

pub(crate) fn new_item(product: ProductUuid, quantity: u32) -> NewCartItem {
    NewCartItem {
        product_uuid: product,
        quantity,
        selected_variants: Vec::new(),
    }
}
