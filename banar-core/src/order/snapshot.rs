//! Order record
//!
//! `final_price` is derived state: every mutator that touches weight,
//! preparation type, discount or free flag re-prices before returning.

use super::input::{NewOrder, OrderEdit, OrderIdentity};
use super::types::{PaymentMethod, PaymentStatus, PreparationType};
use crate::error::{CoreError, CoreResult};
use crate::money::{to_decimal, to_f64};
use crate::pricing::{PriceBreakdown, PricingEngine, validate_delivery_weight, validate_weight};
use crate::util::calendar_date;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display date format (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A retail fish-sale order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID (assigned at creation, immutable)
    pub id: String,
    /// Sequential invoice number
    pub invoice_number: String,
    /// Display date
    pub date: String,
    /// Creation timestamp (Unix millis)
    pub timestamp: i64,

    // === Buyer ===
    /// Staff member who recorded the order
    pub orderer: String,
    pub customer_name: String,
    pub customer_phone: String,

    // === Product ===
    /// Item count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Requested weight (kg)
    pub requested_weight: f64,
    pub preparation_type: PreparationType,
    /// Free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // === Fulfillment ===
    /// Delivered weight (kg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_weight: Option<f64>,
    pub has_staff_discount: bool,
    #[serde(default)]
    pub is_free: bool,
    pub payment_status: PaymentStatus,

    // === Price ===
    /// Amount payable, always equal to the pricing engine's total
    pub final_price: f64,

    /// Provisional back-office entry not yet accepted into the normal flow
    #[serde(default)]
    pub is_office_order: bool,
}

impl Order {
    /// Build a priced order from intake input and an assigned identity
    pub fn create(
        input: NewOrder,
        identity: OrderIdentity,
        engine: &PricingEngine,
        tz: Tz,
    ) -> CoreResult<Self> {
        let date = calendar_date(identity.timestamp, tz)
            .format(DATE_FORMAT)
            .to_string();
        let mut order = Self {
            id: identity.id,
            invoice_number: identity.invoice_number,
            date,
            timestamp: identity.timestamp,
            orderer: input.orderer,
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            quantity: input.quantity,
            requested_weight: input.requested_weight,
            preparation_type: input.preparation_type,
            description: input.description,
            delivery_weight: input.delivery_weight,
            has_staff_discount: input.has_staff_discount,
            is_free: input.is_free,
            payment_status: input.payment_status,
            final_price: 0.0,
            is_office_order: input.is_office_order,
        };
        order.validate()?;
        order.reprice(engine);
        tracing::debug!(
            order_id = %order.id,
            invoice = %order.invoice_number,
            final_price = order.final_price,
            "Order created"
        );
        Ok(order)
    }

    /// Check weight and item count fields
    pub fn validate(&self) -> CoreResult<()> {
        validate_weight(self.requested_weight)?;
        validate_delivery_weight(self.delivery_weight)?;
        if self.quantity == Some(0) {
            return Err(CoreError::InvalidQuantity(0));
        }
        Ok(())
    }

    /// Delivered weight when weighed (> 0), requested weight otherwise
    pub fn effective_weight(&self) -> f64 {
        match self.delivery_weight {
            Some(w) if w > 0.0 => w,
            _ => self.requested_weight,
        }
    }

    /// Price breakdown for the current fields
    pub fn price_breakdown(&self, engine: &PricingEngine) -> PriceBreakdown {
        engine.price_of(
            to_decimal(self.effective_weight()),
            self.preparation_type,
            self.has_staff_discount,
            self.is_free,
        )
    }

    /// Recompute and store `final_price`
    pub fn reprice(&mut self, engine: &PricingEngine) {
        self.final_price = to_f64(self.price_breakdown(engine).total_price);
    }

    /// Whether the stored price matches the engine's total
    pub fn is_price_consistent(&self, engine: &PricingEngine) -> bool {
        to_decimal(self.final_price) == self.price_breakdown(engine).total_price
    }

    /// Stored price as a Decimal
    pub fn final_price_decimal(&self) -> Decimal {
        to_decimal(self.final_price)
    }

    /// Apply a partial edit and re-price
    ///
    /// On validation failure the order is left unchanged.
    pub fn apply_edit(&mut self, edit: OrderEdit, engine: &PricingEngine) -> CoreResult<()> {
        let mut next = self.clone();
        if let Some(v) = edit.orderer {
            next.orderer = v;
        }
        if let Some(v) = edit.customer_name {
            next.customer_name = v;
        }
        if let Some(v) = edit.customer_phone {
            next.customer_phone = v;
        }
        if let Some(v) = edit.quantity {
            next.quantity = v;
        }
        if let Some(v) = edit.requested_weight {
            next.requested_weight = v;
        }
        if let Some(v) = edit.preparation_type {
            next.preparation_type = v;
        }
        if let Some(v) = edit.description {
            next.description = v.filter(|d| !d.is_empty());
        }
        if let Some(v) = edit.delivery_weight {
            next.delivery_weight = v;
        }
        if let Some(v) = edit.has_staff_discount {
            next.has_staff_discount = v;
        }
        if let Some(v) = edit.is_free {
            next.is_free = v;
        }
        if let Some(v) = edit.payment_status {
            next.payment_status = v;
        }
        if let Some(v) = edit.is_office_order {
            next.is_office_order = v;
        }

        next.validate()?;
        next.reprice(engine);
        *self = next;
        Ok(())
    }

    /// Record payment
    pub fn mark_paid(&mut self, method: PaymentMethod) {
        self.payment_status = method.into();
    }

    /// Reopen a paid order
    pub fn mark_unpaid(&mut self) {
        self.payment_status = PaymentStatus::Unpaid;
    }

    /// Accept an office order into the normal flow
    pub fn accept_office_order(&mut self) {
        self.is_office_order = false;
    }
}
