//! Per-bucket running totals and single-order contributions

use crate::classify::{Bucket, classify};
use crate::error::CoreResult;
use crate::money::to_decimal;
use crate::order::{Order, PaymentMethod, PreparationType};
use crate::pricing::PricingEngine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Effective weight sold per preparation type (kg)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeWeights {
    pub standard_fillet: Decimal,
    pub cleaned: Decimal,
    pub damage_sale: Decimal,
}

impl TypeWeights {
    pub fn get(&self, preparation: PreparationType) -> Decimal {
        match preparation {
            PreparationType::StandardFillet => self.standard_fillet,
            PreparationType::Cleaned => self.cleaned,
            PreparationType::DamageSale => self.damage_sale,
        }
    }

    fn get_mut(&mut self, preparation: PreparationType) -> &mut Decimal {
        match preparation {
            PreparationType::StandardFillet => &mut self.standard_fillet,
            PreparationType::Cleaned => &mut self.cleaned,
            PreparationType::DamageSale => &mut self.damage_sale,
        }
    }
}

/// One order's effect on the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub bucket: Bucket,
    /// Engine total (zero for free orders)
    pub revenue: Decimal,
    /// Effective weight (kg), counted for free orders too
    pub weight: Decimal,
    /// Item count, zero when not recorded
    pub items: u64,
    pub is_free: bool,
    pub preparation: PreparationType,
    /// Settlement method for paid orders
    pub method: Option<PaymentMethod>,
}

impl Contribution {
    /// Compute an order's contribution from its current fields
    ///
    /// The order is validated first: the ledger never accepts a weight the
    /// pricing engine would reject.
    pub fn of(order: &Order, engine: &PricingEngine) -> CoreResult<Self> {
        order.validate()?;
        Ok(Self {
            bucket: classify(order),
            revenue: order.price_breakdown(engine).total_price,
            weight: to_decimal(order.effective_weight()),
            items: order.quantity.map(u64::from).unwrap_or(0),
            is_free: order.is_free,
            preparation: order.preparation_type,
            method: order.payment_status.method(),
        })
    }
}

/// Aggregates for one bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub order_count: u64,
    /// Sum of order totals
    pub revenue: Decimal,
    /// Sum of effective weights (kg)
    pub weight: Decimal,
    /// Sum of item counts
    pub item_count: u64,
    pub free_count: u64,
    pub weight_by_type: TypeWeights,
    /// Revenue settled in cash
    pub cash_revenue: Decimal,
    /// Revenue settled by card
    pub card_revenue: Decimal,
}

impl BucketTotals {
    pub(crate) fn add(&mut self, c: &Contribution) {
        self.order_count += 1;
        self.revenue += c.revenue;
        self.weight += c.weight;
        self.item_count += c.items;
        if c.is_free {
            self.free_count += 1;
        }
        *self.weight_by_type.get_mut(c.preparation) += c.weight;
        match c.method {
            Some(PaymentMethod::Cash) => self.cash_revenue += c.revenue,
            Some(PaymentMethod::Card) => self.card_revenue += c.revenue,
            None => {}
        }
    }

    /// Caller guarantees `c` was previously added to this bucket
    pub(crate) fn retract(&mut self, c: &Contribution) {
        self.order_count -= 1;
        self.revenue -= c.revenue;
        self.weight -= c.weight;
        self.item_count -= c.items;
        if c.is_free {
            self.free_count -= 1;
        }
        *self.weight_by_type.get_mut(c.preparation) -= c.weight;
        match c.method {
            Some(PaymentMethod::Cash) => self.cash_revenue -= c.revenue,
            Some(PaymentMethod::Card) => self.card_revenue -= c.revenue,
            None => {}
        }
    }

    /// Sum of two buckets
    pub fn merged(&self, other: &BucketTotals) -> BucketTotals {
        BucketTotals {
            order_count: self.order_count + other.order_count,
            revenue: self.revenue + other.revenue,
            weight: self.weight + other.weight,
            item_count: self.item_count + other.item_count,
            free_count: self.free_count + other.free_count,
            weight_by_type: TypeWeights {
                standard_fillet: self.weight_by_type.standard_fillet
                    + other.weight_by_type.standard_fillet,
                cleaned: self.weight_by_type.cleaned + other.weight_by_type.cleaned,
                damage_sale: self.weight_by_type.damage_sale + other.weight_by_type.damage_sale,
            },
            cash_revenue: self.cash_revenue + other.cash_revenue,
            card_revenue: self.card_revenue + other.card_revenue,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }
}
