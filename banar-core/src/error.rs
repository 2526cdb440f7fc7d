//! Error codes and the core error type
//!
//! Every error raised by this crate is a caller contract violation or a
//! malformed input at the load boundary. Codes are grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Order input errors
//! - 2xxx: Ledger errors
//! - 3xxx: Stored data errors
//! - 9xxx: Configuration errors

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable numeric error code
///
/// Serialized as `u16` so the shell can map it to a localized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 1xxx: Order input ====================
    /// Weight is not a positive finite number
    InvalidWeight = 1001,
    /// Delivered weight is negative or not finite
    InvalidDeliveryWeight = 1002,
    /// Item count is zero
    InvalidQuantity = 1003,
    /// Price does not fit the money representation
    PriceOverflow = 1004,

    // ==================== 2xxx: Ledger ====================
    /// Delta with neither a previous nor a next snapshot
    EmptyDelta = 2001,
    /// Update delta whose snapshots carry different ids
    IdMismatch = 2002,
    /// Retraction of an order the ledger never added
    NotTracked = 2003,
    /// Creation of an order the ledger already holds
    AlreadyTracked = 2004,
    /// Previous snapshot differs from the one the ledger applied
    StaleSnapshot = 2005,

    // ==================== 3xxx: Stored data ====================
    /// Preparation type string not recognized
    UnknownPreparationType = 3001,
    /// Payment status string not recognized
    UnknownPaymentStatus = 3002,

    // ==================== 9xxx: Configuration ====================
    /// Configuration value is malformed
    ConfigInvalid = 9001,
}

impl ErrorCode {
    /// Default message for the code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::InvalidWeight => "Weight must be a positive number",
            Self::InvalidDeliveryWeight => "Delivered weight must be zero or positive",
            Self::InvalidQuantity => "Item count must be positive",
            Self::PriceOverflow => "Price is out of range",
            Self::EmptyDelta => "Delta requires a previous or next order",
            Self::IdMismatch => "Previous and next order ids differ",
            Self::NotTracked => "Order is not tracked by the ledger",
            Self::AlreadyTracked => "Order is already tracked by the ledger",
            Self::StaleSnapshot => "Previous order snapshot is out of date",
            Self::UnknownPreparationType => "Unknown preparation type",
            Self::UnknownPaymentStatus => "Unknown payment status",
            Self::ConfigInvalid => "Invalid configuration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", u16::from(*self))
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown `u16` to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            1001 => Self::InvalidWeight,
            1002 => Self::InvalidDeliveryWeight,
            1003 => Self::InvalidQuantity,
            1004 => Self::PriceOverflow,
            2001 => Self::EmptyDelta,
            2002 => Self::IdMismatch,
            2003 => Self::NotTracked,
            2004 => Self::AlreadyTracked,
            2005 => Self::StaleSnapshot,
            3001 => Self::UnknownPreparationType,
            3002 => Self::UnknownPaymentStatus,
            9001 => Self::ConfigInvalid,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

/// Core errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Invalid weight: {0}")]
    InvalidWeight(f64),

    #[error("Invalid delivery weight: {0}")]
    InvalidDeliveryWeight(f64),

    #[error("Invalid item count: {0}")]
    InvalidQuantity(u32),

    #[error("Price out of range for weight {weight}")]
    PriceOverflow { weight: String },

    #[error("Delta requires a previous or next order")]
    EmptyDelta,

    #[error("Order id mismatch: previous {previous}, next {next}")]
    IdMismatch { previous: String, next: String },

    #[error("Order not tracked by ledger: {0}")]
    NotTracked(String),

    #[error("Order already tracked by ledger: {0}")]
    AlreadyTracked(String),

    #[error("Previous snapshot of order {0} is out of date")]
    StaleSnapshot(String),

    #[error("Unknown preparation type '{value}' on order {order_id}")]
    UnknownPreparationType { order_id: String, value: String },

    #[error("Unknown payment status '{value}' on order {order_id}")]
    UnknownPaymentStatus { order_id: String, value: String },

    #[error("Invalid configuration: {key} = '{value}'")]
    Config { key: String, value: String },
}

impl CoreError {
    /// Error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidWeight(_) => ErrorCode::InvalidWeight,
            Self::InvalidDeliveryWeight(_) => ErrorCode::InvalidDeliveryWeight,
            Self::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            Self::PriceOverflow { .. } => ErrorCode::PriceOverflow,
            Self::EmptyDelta => ErrorCode::EmptyDelta,
            Self::IdMismatch { .. } => ErrorCode::IdMismatch,
            Self::NotTracked(_) => ErrorCode::NotTracked,
            Self::AlreadyTracked(_) => ErrorCode::AlreadyTracked,
            Self::StaleSnapshot(_) => ErrorCode::StaleSnapshot,
            Self::UnknownPreparationType { .. } => ErrorCode::UnknownPreparationType,
            Self::UnknownPaymentStatus { .. } => ErrorCode::UnknownPaymentStatus,
            Self::Config { .. } => ErrorCode::ConfigInvalid,
        }
    }

    pub(crate) fn config(key: &str, value: impl Into<String>) -> Self {
        Self::Config {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_u16_roundtrip() {
        for code in [
            ErrorCode::InvalidWeight,
            ErrorCode::EmptyDelta,
            ErrorCode::NotTracked,
            ErrorCode::AlreadyTracked,
            ErrorCode::StaleSnapshot,
            ErrorCode::PriceOverflow,
            ErrorCode::UnknownPaymentStatus,
            ErrorCode::ConfigInvalid,
        ] {
            assert_eq!(ErrorCode::try_from(u16::from(code)), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_code_display() {
        assert_eq!(ErrorCode::InvalidWeight.to_string(), "E1001");
        assert_eq!(ErrorCode::Unknown.to_string(), "E0001");
    }

    #[test]
    fn test_error_maps_to_code() {
        let err = CoreError::IdMismatch {
            previous: "a".into(),
            next: "b".into(),
        };
        assert_eq!(err.code(), ErrorCode::IdMismatch);
        assert_eq!(err.to_string(), "Order id mismatch: previous a, next b");
    }

    #[test]
    fn test_code_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::EmptyDelta).unwrap();
        assert_eq!(json, "2001");
    }
}
