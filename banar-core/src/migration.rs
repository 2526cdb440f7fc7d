//! Load-time migration of stored order records
//!
//! Stored records carry free-form strings for preparation type and payment
//! status, written by several schema versions. This is the only place those
//! strings are recognized; everything downstream works on the closed enums.

use crate::error::{CoreError, CoreResult};
use crate::money::to_decimal;
use crate::order::{Order, PaymentStatus, PreparationType};
use crate::pricing::PricingEngine;
use serde::{Deserialize, Serialize};

// Labels written by the intake form
const FILLET_LABEL: &str = "فیله";
const CLEANED_LABEL: &str = "پاک شده";
const DAMAGE_LABEL: &str = "فروش ماهی حذفی";
/// Damage label from an earlier release
const LEGACY_DAMAGE_LABEL: &str = "فروش تلفات";

const UNPAID_LABEL: &str = "پرداخت نشده";
const PAID_CASH_LABEL: &str = "پرداخت شده (نقد)";
const PAID_CARD_LABEL: &str = "پرداخت شده (کارت)";
/// Paid status from before cash and card were distinguished
const LEGACY_PAID_LABEL: &str = "پرداخت شده";

/// Order record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    pub id: String,
    pub invoice_number: String,
    #[serde(default)]
    pub date: String,
    pub timestamp: i64,
    #[serde(default)]
    pub orderer: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    pub requested_weight: f64,
    pub preparation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_weight: Option<f64>,
    #[serde(default)]
    pub has_staff_discount: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,
    pub payment_status: String,
    #[serde(default)]
    pub final_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_office_order: Option<bool>,
}

impl From<&Order> for RawOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            invoice_number: order.invoice_number.clone(),
            date: order.date.clone(),
            timestamp: order.timestamp,
            orderer: order.orderer.clone(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            quantity: order.quantity,
            requested_weight: order.requested_weight,
            preparation_type: order.preparation_type.code().to_string(),
            description: order.description.clone(),
            delivery_weight: order.delivery_weight,
            has_staff_discount: order.has_staff_discount,
            is_free: Some(order.is_free),
            payment_status: order.payment_status.code().to_string(),
            final_price: order.final_price,
            is_office_order: Some(order.is_office_order),
        }
    }
}

/// Recognize a stored preparation type string
pub fn parse_preparation_type(value: &str) -> Option<PreparationType> {
    match value.trim() {
        "STANDARD_FILLET" | FILLET_LABEL => Some(PreparationType::StandardFillet),
        "CLEANED" | CLEANED_LABEL => Some(PreparationType::Cleaned),
        "DAMAGE_SALE" | DAMAGE_LABEL | LEGACY_DAMAGE_LABEL => Some(PreparationType::DamageSale),
        _ => None,
    }
}

/// Recognize a stored payment status string
///
/// The legacy undifferentiated paid status maps to card.
pub fn parse_payment_status(value: &str) -> Option<PaymentStatus> {
    match value.trim() {
        "UNPAID" | UNPAID_LABEL => Some(PaymentStatus::Unpaid),
        "PAID_CASH" | PAID_CASH_LABEL => Some(PaymentStatus::PaidCash),
        "PAID_CARD" | PAID_CARD_LABEL | LEGACY_PAID_LABEL => Some(PaymentStatus::PaidCard),
        _ => None,
    }
}

/// Convert one stored record into an [`Order`]
///
/// Legacy strings are remapped silently. The price is recomputed from the
/// record's fields; a stored price that disagrees is replaced with a warning.
/// Applying this to the stored form of its own output yields the same order.
pub fn migrate_legacy_status(raw: RawOrder, engine: &PricingEngine) -> CoreResult<Order> {
    let preparation_type = parse_preparation_type(&raw.preparation_type).ok_or_else(|| {
        CoreError::UnknownPreparationType {
            order_id: raw.id.clone(),
            value: raw.preparation_type.clone(),
        }
    })?;
    let payment_status = parse_payment_status(&raw.payment_status).ok_or_else(|| {
        CoreError::UnknownPaymentStatus {
            order_id: raw.id.clone(),
            value: raw.payment_status.clone(),
        }
    })?;

    let mut order = Order {
        id: raw.id,
        invoice_number: raw.invoice_number,
        date: raw.date,
        timestamp: raw.timestamp,
        orderer: raw.orderer,
        customer_name: raw.customer_name,
        customer_phone: raw.customer_phone,
        quantity: raw.quantity.filter(|q| *q > 0),
        requested_weight: raw.requested_weight,
        preparation_type,
        description: raw.description.filter(|d| !d.is_empty()),
        delivery_weight: raw.delivery_weight,
        has_staff_discount: raw.has_staff_discount,
        is_free: raw.is_free.unwrap_or(false),
        payment_status,
        final_price: raw.final_price,
        is_office_order: raw.is_office_order.unwrap_or(false),
    };

    if let Err(e) = order.validate() {
        tracing::error!(order_id = %order.id, error = %e, "Stored order failed validation");
        return Err(e);
    }

    let stored_price = to_decimal(order.final_price);
    order.reprice(engine);
    if stored_price != order.final_price_decimal() {
        tracing::warn!(
            order_id = %order.id,
            stored = %stored_price,
            computed = order.final_price,
            "Stored price disagrees with pricing engine, replaced"
        );
    }

    Ok(order)
}

/// Migrate a loaded collection, stopping at the first unrecoverable record
pub fn migrate_all(raw: Vec<RawOrder>, engine: &PricingEngine) -> CoreResult<Vec<Order>> {
    let orders = raw
        .into_iter()
        .map(|r| migrate_legacy_status(r, engine))
        .collect::<CoreResult<Vec<_>>>()?;
    tracing::info!(count = orders.len(), "Stored orders migrated");
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(preparation: &str, status: &str) -> RawOrder {
        RawOrder {
            id: "r1".to_string(),
            invoice_number: "6320".to_string(),
            date: "2024-03-11".to_string(),
            timestamp: 1_710_108_000_000,
            orderer: "staff".to_string(),
            customer_name: "Sara".to_string(),
            customer_phone: "0912".to_string(),
            quantity: None,
            requested_weight: 2.0,
            preparation_type: preparation.to_string(),
            description: None,
            delivery_weight: None,
            has_staff_discount: false,
            is_free: None,
            payment_status: status.to_string(),
            final_price: 900_000.0,
            is_office_order: None,
        }
    }

    #[test]
    fn test_legacy_paid_becomes_card() {
        let order = migrate_legacy_status(raw(FILLET_LABEL, LEGACY_PAID_LABEL), &PricingEngine::default())
            .unwrap();
        assert_eq!(order.payment_status, PaymentStatus::PaidCard);
        assert_eq!(order.preparation_type, PreparationType::StandardFillet);
        assert!(!order.is_free);
        assert!(!order.is_office_order);
    }

    #[test]
    fn test_current_labels_recognized() {
        assert_eq!(parse_payment_status(UNPAID_LABEL), Some(PaymentStatus::Unpaid));
        assert_eq!(parse_payment_status(PAID_CASH_LABEL), Some(PaymentStatus::PaidCash));
        assert_eq!(parse_payment_status(PAID_CARD_LABEL), Some(PaymentStatus::PaidCard));
        assert_eq!(parse_preparation_type(CLEANED_LABEL), Some(PreparationType::Cleaned));
        assert_eq!(parse_preparation_type(DAMAGE_LABEL), Some(PreparationType::DamageSale));
        assert_eq!(parse_preparation_type(LEGACY_DAMAGE_LABEL), Some(PreparationType::DamageSale));
        assert_eq!(parse_preparation_type("CLEANED"), Some(PreparationType::Cleaned));
    }

    #[test]
    fn test_unknown_strings_rejected() {
        let engine = PricingEngine::default();
        let err = migrate_legacy_status(raw("smoked", UNPAID_LABEL), &engine).unwrap_err();
        assert!(matches!(err, CoreError::UnknownPreparationType { ref value, .. } if value == "smoked"));

        let err = migrate_legacy_status(raw(FILLET_LABEL, "refunded"), &engine).unwrap_err();
        assert!(matches!(err, CoreError::UnknownPaymentStatus { ref order_id, .. } if order_id == "r1"));
    }

    #[test]
    fn test_stale_price_replaced() {
        let mut stale = raw(DAMAGE_LABEL, UNPAID_LABEL);
        stale.has_staff_discount = true;
        stale.requested_weight = 5.0;
        stale.final_price = 1.0;
        let order = migrate_legacy_status(stale, &PricingEngine::default()).unwrap();
        assert_eq!(order.final_price, 1_250_000.0);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let engine = PricingEngine::default();
        let mut input = raw(LEGACY_DAMAGE_LABEL, LEGACY_PAID_LABEL);
        input.is_free = Some(true);
        input.quantity = Some(0);
        input.description = Some(String::new());

        let once = migrate_legacy_status(input, &engine).unwrap();
        let twice = migrate_legacy_status(RawOrder::from(&once), &engine).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.quantity, None);
        assert_eq!(once.description, None);
        assert_eq!(once.final_price, 0.0);
    }

    #[test]
    fn test_stored_json_with_missing_flags() {
        let json = r#"[{
            "id": "abc",
            "invoiceNumber": "6311",
            "date": "۱۴۰۳ فروردین",
            "timestamp": 1710108000000,
            "orderer": "staff",
            "customerName": "Sara",
            "customerPhone": "0912",
            "requestedWeight": 1.5,
            "preparationType": "پاک شده",
            "hasStaffDiscount": true,
            "paymentStatus": "پرداخت شده",
            "finalPrice": 607500
        }]"#;
        let raw: Vec<RawOrder> = serde_json::from_str(json).unwrap();
        let orders = migrate_all(raw, &PricingEngine::default()).unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].payment_status, PaymentStatus::PaidCard);
        assert_eq!(orders[0].final_price, 607_500.0);
        assert!(!orders[0].is_office_order);
    }

    #[test]
    fn test_invalid_stored_weight_rejected() {
        let mut bad = raw(FILLET_LABEL, UNPAID_LABEL);
        bad.requested_weight = 0.0;
        let err = migrate_all(vec![bad], &PricingEngine::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidWeight(_)));
    }
}
