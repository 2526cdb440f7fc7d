//! Order model
//!
//! - Types: closed value sets (preparation, payment)
//! - Input: intake and edit payloads
//! - Snapshot: the priced order record

pub mod input;
pub mod snapshot;
pub mod types;

// Re-exports
pub use input::{NewOrder, OrderEdit, OrderIdentity};
pub use snapshot::Order;
pub use types::{PaymentMethod, PaymentStatus, PreparationType};
