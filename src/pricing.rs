// 💲 Pricing - Volume discount math
//
//   subtotal = Σ price × quantity
//   discount = subtotal × rate   (only when distinct products >= threshold)
//   total    = subtotal - discount
//
// "subtotal" is always pre-discount, "total" is always post-discount.

use crate::error::{BundleError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DISCOUNT_THRESHOLD: usize = 3;
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.30;

// ============================================================================
// PRICING CONFIG
// ============================================================================

/// Immutable for the lifetime of a controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Minimum number of distinct products that unlocks the discount
    pub discount_threshold: usize,

    /// Fraction of the subtotal removed once the threshold is met
    pub discount_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            discount_threshold: DEFAULT_DISCOUNT_THRESHOLD,
            discount_rate: DEFAULT_DISCOUNT_RATE,
        }
    }
}

impl PricingConfig {
    pub fn new(discount_threshold: usize, discount_rate: f64) -> Result<Self> {
        let config = PricingConfig {
            discount_threshold,
            discount_rate,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.discount_threshold == 0 {
            return Err(BundleError::invalid_config(
                "discount_threshold",
                "must be at least 1",
            ));
        }

        if !(0.0..1.0).contains(&self.discount_rate) {
            return Err(BundleError::invalid_config(
                "discount_rate",
                format!("{} is outside [0.0, 1.0)", self.discount_rate),
            ));
        }

        Ok(())
    }

    /// Does a bundle of `distinct_products` unlock the discount?
    pub fn qualifies(&self, distinct_products: usize) -> bool {
        distinct_products >= self.discount_threshold
    }

    /// How many more distinct products are needed (0 once qualified)
    pub fn remaining(&self, distinct_products: usize) -> usize {
        self.discount_threshold.saturating_sub(distinct_products)
    }

    /// Discount rate as a whole percentage (0.30 → 30)
    pub fn discount_percent(&self) -> f64 {
        self.discount_rate * 100.0
    }

    /// Apply the volume discount to a subtotal
    pub fn summarize(&self, subtotal: f64, distinct_products: usize) -> PricingSummary {
        let has_discount = self.qualifies(distinct_products);
        let discount_amount = if has_discount {
            subtotal * self.discount_rate
        } else {
            0.0
        };

        PricingSummary {
            subtotal,
            has_discount,
            discount_amount,
            total: subtotal - discount_amount,
            discount_percent: self.discount_percent(),
        }
    }
}

// ============================================================================
// PRICING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    pub subtotal: f64,
    pub has_discount: bool,
    pub discount_amount: f64,
    pub total: f64,
    pub discount_percent: f64,
}

// ============================================================================
// FORMATTING
// ============================================================================

/// "$12.50"
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// "30%" (drops the fraction when it is zero, "12.5%" otherwise)
pub fn format_percent(percent: f64) -> String {
    let rounded = (percent * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}%", rounded)
    } else {
        format!("{}%", rounded)
    }
}

/// Label of the primary "add to cart" action
///
/// Below the threshold it counts down the missing products, at/above it
/// counts the total quantity in the bundle.
pub fn call_to_action_label(
    config: &PricingConfig,
    distinct_products: usize,
    total_quantity: u32,
) -> String {
    if config.qualifies(distinct_products) {
        format!("Add {} Items to Cart", total_quantity)
    } else {
        let remaining = config.remaining(distinct_products);
        let noun = if remaining == 1 { "Item" } else { "Items" };
        format!("Add {} More {} to Cart", remaining, noun)
    }
}

/// Message shown while the bundle is empty
pub fn empty_state_message(config: &PricingConfig) -> String {
    format!(
        "Select {} or more items to unlock {} discount",
        config.discount_threshold,
        format_percent(config.discount_percent())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_config() {
        let config = PricingConfig::default();
        assert_eq!(config.discount_threshold, 3);
        assert!(approx(config.discount_rate, 0.30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(PricingConfig::new(0, 0.3).is_err());
        assert!(PricingConfig::new(3, 1.0).is_err());
        assert!(PricingConfig::new(3, -0.1).is_err());
        assert!(PricingConfig::new(1, 0.0).is_ok());
    }

    #[test]
    fn test_no_discount_below_threshold() {
        let config = PricingConfig::default();
        let summary = config.summarize(30.0, 2);

        assert!(!summary.has_discount);
        assert!(approx(summary.discount_amount, 0.0));
        assert!(approx(summary.total, 30.0));
    }

    #[test]
    fn test_discount_at_threshold() {
        let config = PricingConfig::default();
        let summary = config.summarize(45.0, 3);

        assert!(summary.has_discount);
        assert!(approx(summary.discount_amount, 13.5));
        assert!(approx(summary.total, 31.5));
        assert_eq!(format_currency(summary.discount_amount), "$13.50");
        assert_eq!(format_currency(summary.total), "$31.50");
    }

    #[test]
    fn test_call_to_action_labels() {
        let config = PricingConfig::default();

        assert_eq!(call_to_action_label(&config, 0, 0), "Add 3 More Items to Cart");
        assert_eq!(call_to_action_label(&config, 1, 1), "Add 2 More Items to Cart");
        assert_eq!(call_to_action_label(&config, 2, 5), "Add 1 More Item to Cart");
        assert_eq!(call_to_action_label(&config, 3, 3), "Add 3 Items to Cart");
        assert_eq!(call_to_action_label(&config, 4, 9), "Add 9 Items to Cart");
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(format_percent(30.0), "30%");
        assert_eq!(format_percent(12.5), "12.5%");
        assert_eq!(format_percent(PricingConfig::default().discount_percent()), "30%");
    }

    #[test]
    fn test_empty_state_message() {
        let config = PricingConfig::new(4, 0.25).unwrap();
        assert_eq!(
            empty_state_message(&config),
            "Select 4 or more items to unlock 25% discount"
        );
    }
}
