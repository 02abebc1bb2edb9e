//! Products Data

use rustc_hash::FxHashSet;

use crate::domain::{categories::records::CategoryUuid, products::records::ProductVariant};

/// Product fields supplied on create and on full update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub category_uuid: Option<CategoryUuid>,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub quantity: u32,
    pub active: bool,
    pub image_url: Option<String>,
    pub variants: Vec<ProductVariant>,
}

/// New Product Data
pub type NewProduct = ProductDetails;

/// Product Update Data
pub type ProductUpdate = ProductDetails;

impl ProductDetails {
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        }

        let mut seen = FxHashSet::default();

        for variant in &self.variants {
            if variant.name.trim().is_empty() || variant.value.trim().is_empty() {
                problems.push("variant name and value are required".to_string());
                continue;
            }

            if !seen.insert((variant.name.as_str(), variant.value.as_str())) {
                problems.push(format!(
                    "variant {}={} is listed more than once",
                    variant.name, variant.value
                ));
            }
        }

        problems
    }
}

/// Listing filter for product reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Restrict the listing to one category.
    pub category: Option<CategoryUuid>,

    /// Include products that are switched off for sale.
    pub include_inactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(name: &str, value: &str) -> ProductVariant {
        ProductVariant {
            name: name.to_string(),
            value: value.to_string(),
            price: 0,
        }
    }

    fn details(variants: Vec<ProductVariant>) -> ProductDetails {
        ProductDetails {
            category_uuid: None,
            name: "Campus Hoodie".to_string(),
            description: None,
            price: 2_500,
            quantity: 10,
            active: true,
            image_url: None,
            variants,
        }
    }

    #[test]
    fn distinct_variants_are_accepted() {
        let product = details(vec![variant("size", "M"), variant("size", "L")]);

        assert!(product.problems().is_empty());
    }

    #[test]
    fn repeated_variant_is_reported() {
        let product = details(vec![variant("size", "M"), variant("size", "M")]);

        assert_eq!(product.problems().len(), 1);
    }

    #[test]
    fn blank_variant_and_name_are_reported() {
        let mut product = details(vec![variant("", "M")]);
        product.name = " ".to_string();

        assert_eq!(product.problems().len(), 2);
    }
}
