//! Cart Data

use rustc_hash::FxHashMap;

use crate::domain::{
    carts::records::{CartItemRecord, CartItemUuid},
    products::records::{ProductRecord, ProductUuid, ProductVariant},
};

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 10;

/// A variant option chosen by the shopper, identified by name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantChoice {
    pub name: String,
    pub value: String,
}

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub selected_variants: Vec<VariantChoice>,
}

pub(crate) fn quantity_problem(quantity: u32) -> Option<String> {
    (!(1..=MAX_LINE_QUANTITY).contains(&quantity))
        .then(|| format!("quantity must be between 1 and {MAX_LINE_QUANTITY}, got {quantity}"))
}

/// Match the shopper's choices against the catalog's options.
///
/// Prices always come from the catalog. The result is sorted so two selections of the
/// same options compare equal regardless of the order they were chosen in.
pub(crate) fn resolve_variants(
    product: &ProductRecord,
    choices: &[VariantChoice],
) -> Result<Vec<ProductVariant>, Vec<String>> {
    let mut problems = Vec::new();
    let mut resolved: Vec<ProductVariant> = Vec::with_capacity(choices.len());

    for choice in choices {
        if resolved.iter().any(|variant| variant.name == choice.name) {
            problems.push(format!("variant {} selected more than once", choice.name));
            continue;
        }

        match product.variant(&choice.name, &choice.value) {
            Some(variant) => resolved.push(variant.clone()),
            None => problems.push(format!(
                "{}={} is not an option of {}",
                choice.name, choice.value, product.name
            )),
        }
    }

    if !problems.is_empty() {
        return Err(problems);
    }

    resolved.sort();

    Ok(resolved)
}

/// Base price plus the price of every selected option.
pub(crate) fn unit_price(product: &ProductRecord, variants: &[ProductVariant]) -> Option<u64> {
    variants
        .iter()
        .try_fold(product.price, |price, variant| price.checked_add(variant.price))
}

/// Units of each product held across the given lines, skipping `except`.
pub(crate) fn demand_by_product(
    items: &[CartItemRecord],
    except: Option<CartItemUuid>,
) -> FxHashMap<ProductUuid, u32> {
    let mut demand = FxHashMap::default();

    for item in items.iter().filter(|item| Some(item.uuid) != except) {
        let held = demand.entry(item.product_uuid).or_insert(0_u32);
        *held = held.saturating_add(item.quantity);
    }

    demand
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn hoodie() -> ProductRecord {
        let option = |name: &str, value: &str, price| ProductVariant {
            name: name.to_string(),
            value: value.to_string(),
            price,
        };

        ProductRecord {
            uuid: ProductUuid::new(),
            category_uuid: None,
            name: "Hoodie".to_string(),
            description: None,
            price: 2_000,
            quantity: 5,
            active: true,
            image_url: None,
            variants: vec![
                option("size", "M", 0),
                option("size", "XL", 150),
                option("colour", "navy", 50),
            ],
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    fn choice(name: &str, value: &str) -> VariantChoice {
        VariantChoice {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn quantity_bounds() {
        assert!(quantity_problem(0).is_some());
        assert!(quantity_problem(1).is_none());
        assert!(quantity_problem(MAX_LINE_QUANTITY).is_none());
        assert!(quantity_problem(MAX_LINE_QUANTITY + 1).is_some());
    }

    #[test]
    fn selection_order_does_not_matter() {
        let product = hoodie();

        let a = resolve_variants(&product, &[choice("size", "XL"), choice("colour", "navy")]);
        let b = resolve_variants(&product, &[choice("colour", "navy"), choice("size", "XL")]);

        assert!(a.is_ok());
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_and_repeated_options_are_reported() {
        let product = hoodie();

        let result = resolve_variants(
            &product,
            &[
                choice("size", "S"),
                choice("colour", "navy"),
                choice("colour", "navy"),
            ],
        );

        assert_eq!(result.map_err(|problems| problems.len()), Err(2));
    }

    #[test]
    fn unit_price_adds_catalog_option_prices() {
        let product = hoodie();

        let variants =
            resolve_variants(&product, &[choice("size", "XL"), choice("colour", "navy")])
                .unwrap_or_default();

        assert_eq!(variants.len(), 2);
        assert_eq!(unit_price(&product, &variants), Some(2_200));
        assert_eq!(unit_price(&product, &[]), Some(2_000));
    }
}
