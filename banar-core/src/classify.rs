//! Order state classifier
//!
//! Precedence:
//! 1. office flag set: `Office`, payment status ignored
//! 2. unpaid: `Active`
//! 3. paid by cash or card: `Archived`

use crate::order::{Order, PaymentStatus};
use serde::{Deserialize, Serialize};

/// Lifecycle bucket an order occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bucket {
    /// Provisional back-office entry
    Office,
    /// Unpaid order in the normal flow
    Active,
    /// Paid order
    Archived,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Office, Bucket::Active, Bucket::Archived];
}

/// Bucket for raw classification fields
pub fn classify_fields(is_office_order: bool, payment_status: PaymentStatus) -> Bucket {
    if is_office_order {
        return Bucket::Office;
    }
    match payment_status {
        PaymentStatus::Unpaid => Bucket::Active,
        PaymentStatus::PaidCash | PaymentStatus::PaidCard => Bucket::Archived,
    }
}

/// Bucket an order belongs to
pub fn classify(order: &Order) -> Bucket {
    classify_fields(order.is_office_order, order.payment_status)
}
