//! Closed value sets for order attributes

use serde::{Deserialize, Serialize};

// ============================================================================
// Preparation Type
// ============================================================================

/// How the fish is prepared for the customer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreparationType {
    /// Filleted
    #[default]
    StandardFillet,
    /// Gutted and cleaned
    Cleaned,
    /// Damaged stock sold at a reduced rate, never discounted
    DamageSale,
}

impl PreparationType {
    pub const ALL: [PreparationType; 3] = [
        PreparationType::StandardFillet,
        PreparationType::Cleaned,
        PreparationType::DamageSale,
    ];

    /// Canonical storage code
    pub fn code(&self) -> &'static str {
        match self {
            Self::StandardFillet => "STANDARD_FILLET",
            Self::Cleaned => "CLEANED",
            Self::DamageSale => "DAMAGE_SALE",
        }
    }

    pub fn is_damage(&self) -> bool {
        matches!(self, Self::DamageSale)
    }
}

// ============================================================================
// Payment
// ============================================================================

/// How a paid order was settled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// Payment status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    PaidCash,
    PaidCard,
}

impl PaymentStatus {
    /// Canonical storage code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unpaid => "UNPAID",
            Self::PaidCash => "PAID_CASH",
            Self::PaidCard => "PAID_CARD",
        }
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, Self::Unpaid)
    }

    /// Settlement method, `None` while unpaid
    pub fn method(&self) -> Option<PaymentMethod> {
        match self {
            Self::Unpaid => None,
            Self::PaidCash => Some(PaymentMethod::Cash),
            Self::PaidCard => Some(PaymentMethod::Card),
        }
    }
}

impl From<PaymentMethod> for PaymentStatus {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::PaidCash,
            PaymentMethod::Card => Self::PaidCard,
        }
    }
}
