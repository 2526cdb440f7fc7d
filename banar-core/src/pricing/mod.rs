//! Pricing engine
//!
//! Maps (weight, preparation type, staff discount flag, free flag) to a price
//! breakdown. Pure and deterministic: the same inputs and [`PricingConfig`]
//! always produce the same breakdown.
//!
//! Order of operations:
//! 1. base unit price: damage rate for `DamageSale`, regular rate otherwise
//! 2. staff discount: `base * rate`, only when discounted, not damage, not free
//! 3. final unit price: `base - discount`
//! 4. total: `weight * final unit price`, rounded to 2 decimal places
//! 5. free override: total and final unit price reported as zero, base kept

use crate::config::PricingConfig;
use crate::error::{CoreError, CoreResult};
use crate::money::{round_money, to_decimal};
use crate::order::PreparationType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum accepted weight per order (kg)
pub const MAX_WEIGHT_KG: f64 = 10_000.0;

/// Maximum configurable rate per kg
pub const MAX_RATE_PER_KG: i64 = 1_000_000_000;

/// Price breakdown for one order
///
/// `base_unit_price` is always reported, even for free orders, so the receipt
/// can show what the order would have cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Rate per kg before any discount
    pub base_unit_price: Decimal,
    /// Discount per kg
    pub discount_amount: Decimal,
    /// Rate per kg after discount, zero for free orders
    pub final_unit_price: Decimal,
    /// Amount payable
    pub total_price: Decimal,
}

/// Validate a requested (or effective) weight
///
/// Must be finite, strictly positive and not above [`MAX_WEIGHT_KG`].
pub fn validate_weight(weight: f64) -> CoreResult<()> {
    if !weight.is_finite() || weight <= 0.0 || weight > MAX_WEIGHT_KG {
        return Err(CoreError::InvalidWeight(weight));
    }
    Ok(())
}

/// Validate an optional delivered weight (zero means "not weighed yet")
pub fn validate_delivery_weight(weight: Option<f64>) -> CoreResult<()> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 || w > MAX_WEIGHT_KG => {
            Err(CoreError::InvalidDeliveryWeight(w))
        }
        _ => Ok(()),
    }
}

/// Pricing engine bound to a set of configured rates
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Build from a config, rejecting rates outside the accepted bounds
    pub fn try_new(config: PricingConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Base rate per kg for a preparation type
    pub fn base_unit_price(&self, category: PreparationType) -> Decimal {
        if category.is_damage() {
            self.config.damage_price_per_kg
        } else {
            self.config.price_per_kg
        }
    }

    /// Compute the price breakdown
    ///
    /// The weight is not validated here; callers go through
    /// [`validate_weight`] or [`PricingEngine::price_of_checked`]. A total
    /// that does not fit a `Decimal` is logged and reported as zero.
    pub fn price_of(
        &self,
        weight: Decimal,
        category: PreparationType,
        has_discount: bool,
        is_free: bool,
    ) -> PriceBreakdown {
        self.try_price_of(weight, category, has_discount, is_free)
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Price overflow, reporting zero total");
                PriceBreakdown {
                    base_unit_price: self.base_unit_price(category),
                    discount_amount: Decimal::ZERO,
                    final_unit_price: Decimal::ZERO,
                    total_price: Decimal::ZERO,
                }
            })
    }

    fn try_price_of(
        &self,
        weight: Decimal,
        category: PreparationType,
        has_discount: bool,
        is_free: bool,
    ) -> CoreResult<PriceBreakdown> {
        let overflow = || CoreError::PriceOverflow {
            weight: weight.to_string(),
        };
        let base_unit_price = self.base_unit_price(category);

        let discount_amount = if has_discount && !category.is_damage() && !is_free {
            base_unit_price
                .checked_mul(self.config.staff_discount_rate)
                .ok_or_else(overflow)?
        } else {
            Decimal::ZERO
        };

        let final_unit_price = base_unit_price - discount_amount;
        let total_price = round_money(
            weight
                .checked_mul(final_unit_price)
                .ok_or_else(overflow)?,
        );

        if is_free {
            return Ok(PriceBreakdown {
                base_unit_price,
                discount_amount,
                final_unit_price: Decimal::ZERO,
                total_price: Decimal::ZERO,
            });
        }

        Ok(PriceBreakdown {
            base_unit_price,
            discount_amount,
            final_unit_price,
            total_price,
        })
    }

    /// Validate the weight, then compute the price breakdown
    pub fn price_of_checked(
        &self,
        weight: f64,
        category: PreparationType,
        has_discount: bool,
        is_free: bool,
    ) -> CoreResult<PriceBreakdown> {
        validate_weight(weight)?;
        self.try_price_of(to_decimal(weight), category, has_discount, is_free)
    }
}
