//! Order Data

use crate::domain::orders::{
    records::ShippingAddress,
    status::{OrderStatus, PaymentMethod, PaymentStatus},
};

/// Limits applied while turning a cart into an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Largest accepted difference, in minor units, between client and server amounts.
    pub total_tolerance: u64,

    /// Order number candidates tried before checkout gives up.
    pub order_number_attempts: u32,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            total_tolerance: 1,
            order_number_attempts: 10,
        }
    }
}

/// Checkout request.
///
/// Amounts are the client's view and are only checked; the order is priced from the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPayload {
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total_amount: u64,
    pub notes: Option<String>,
}

impl CheckoutPayload {
    /// Check the request on its own, returning the parsed payment method.
    ///
    /// # Errors
    ///
    /// Returns every problem found.
    pub fn validate(&self) -> Result<PaymentMethod, Vec<String>> {
        let address = &self.shipping_address;
        let mut problems = Vec::new();

        for (field, value) in [
            ("full_name", &address.full_name),
            ("phone", &address.phone),
            ("line1", &address.line1),
            ("city", &address.city),
            ("state", &address.state),
            ("postal_code", &address.postal_code),
            ("country", &address.country),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("shipping_address.{field} is required"));
            }
        }

        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|error| problems.push(error.to_string()))
            .ok();

        match payment_method {
            Some(method) if problems.is_empty() => Ok(method),
            _ => Err(problems),
        }
    }

    /// Compare the client's amounts with the cart, returning the server total.
    ///
    /// # Errors
    ///
    /// Returns the mismatches when either amount is off by more than `tolerance`.
    pub fn reconcile(&self, subtotal: u64, tolerance: u64) -> Result<u64, Vec<String>> {
        let mut problems = Vec::new();

        if self.subtotal.abs_diff(subtotal) > tolerance {
            problems.push(format!(
                "subtotal {} does not match cart subtotal {subtotal}",
                self.subtotal
            ));
        }

        let total = subtotal
            .checked_add(self.tax)
            .and_then(|total| total.checked_add(self.shipping));

        match total {
            Some(total) if self.total_amount.abs_diff(total) > tolerance => {
                problems.push(format!(
                    "total_amount {} does not match computed total {total}",
                    self.total_amount
                ));
            }
            Some(_) => {}
            None => problems.push("order total is too large".to_string()),
        }

        match total {
            Some(total) if problems.is_empty() => Ok(total),
            _ => Err(problems),
        }
    }
}

/// Admin status change. Absent fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

/// Admin order listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Lovelace".to_string(),
            phone: "+91 98765 43210".to_string(),
            line1: "Hostel 4, Room 12".to_string(),
            line2: None,
            city: "Pune".to_string(),
            state: "MH".to_string(),
            postal_code: "411007".to_string(),
            country: "IN".to_string(),
        }
    }

    fn payload(subtotal: u64, tax: u64, shipping: u64, total_amount: u64) -> CheckoutPayload {
        CheckoutPayload {
            shipping_address: address(),
            payment_method: "cash_on_delivery".to_string(),
            subtotal,
            tax,
            shipping,
            total_amount,
            notes: None,
        }
    }

    #[test]
    fn complete_payload_yields_payment_method() {
        assert_eq!(
            payload(100, 0, 0, 100).validate(),
            Ok(PaymentMethod::CashOnDelivery)
        );
    }

    #[test]
    fn blank_address_fields_and_unknown_method_are_all_reported() {
        let mut request = payload(100, 0, 0, 100);
        request.shipping_address.city = " ".to_string();
        request.shipping_address.postal_code = String::new();
        request.payment_method = "barter".to_string();

        let problems = request.validate().err().unwrap_or_default();

        assert_eq!(problems.len(), 3, "{problems:?}");
    }

    #[test]
    fn totals_within_tolerance_are_accepted() {
        assert_eq!(payload(5_001, 90, 40, 5_129).reconcile(5_000, 1), Ok(5_130));
    }

    #[test]
    fn mismatched_totals_are_rejected() {
        let problems = payload(5_000, 90, 40, 9_999)
            .reconcile(5_000, 1)
            .err()
            .unwrap_or_default();

        assert_eq!(problems.len(), 1);
        assert!(problems.iter().all(|p| p.contains("total_amount")));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        assert!(payload(1, u64::MAX, 1, 0).reconcile(1, 1).is_err());
    }
}
