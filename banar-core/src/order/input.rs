//! Order input payloads for intake and edits

use super::types::{PaymentStatus, PreparationType};
use serde::{Deserialize, Serialize};

/// Identity assigned by the intake workflow before the order reaches the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIdentity {
    /// Stable unique id
    pub id: String,
    /// Sequential invoice number (opaque string)
    pub invoice_number: String,
    /// Creation time (Unix millis)
    pub timestamp: i64,
}

/// New order payload from the intake form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Staff member recording the order
    pub orderer: String,
    pub customer_name: String,
    pub customer_phone: String,
    /// Item count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Requested weight (kg)
    pub requested_weight: f64,
    pub preparation_type: PreparationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Delivered weight (kg), zero or absent until weighed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_weight: Option<f64>,
    #[serde(default)]
    pub has_staff_discount: bool,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub is_office_order: bool,
}

impl NewOrder {
    /// Minimal unpaid order with the remaining fields defaulted
    pub fn new(
        orderer: impl Into<String>,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        requested_weight: f64,
        preparation_type: PreparationType,
    ) -> Self {
        Self {
            orderer: orderer.into(),
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            quantity: None,
            requested_weight,
            preparation_type,
            description: None,
            delivery_weight: None,
            has_staff_discount: false,
            is_free: false,
            payment_status: PaymentStatus::Unpaid,
            is_office_order: false,
        }
    }
}

/// Partial edit of an existing order
///
/// `None` leaves a field unchanged. For the nested options, `Some(None)` clears
/// the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderEdit {
    pub orderer: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub quantity: Option<Option<u32>>,
    pub requested_weight: Option<f64>,
    pub preparation_type: Option<PreparationType>,
    pub description: Option<Option<String>>,
    pub delivery_weight: Option<Option<f64>>,
    pub has_staff_discount: Option<bool>,
    pub is_free: Option<bool>,
    pub payment_status: Option<PaymentStatus>,
    pub is_office_order: Option<bool>,
}

impl OrderEdit {
    /// Whether the edit touches any field the price depends on
    pub fn affects_price(&self) -> bool {
        self.requested_weight.is_some()
            || self.delivery_weight.is_some()
            || self.preparation_type.is_some()
            || self.has_staff_discount.is_some()
            || self.is_free.is_some()
    }
}
