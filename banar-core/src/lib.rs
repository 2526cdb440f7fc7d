//! Order pricing and aggregation core for the fish-sale register
//!
//! - Pricing: order attributes to a price breakdown
//! - Classification: office / active / archived buckets
//! - Ledger: per-bucket totals maintained by delta application
//! - Query: text and date filters over the bucketed collection
//! - Migration: stored records to typed orders at load time

pub mod classify;
pub mod config;
pub mod error;
pub mod invoice;
pub mod ledger;
pub mod logger;
pub mod migration;
pub mod money;
pub mod order;
pub mod pricing;
pub mod query;
pub mod util;

// Re-exports
pub use classify::{Bucket, classify};
pub use config::{CoreConfig, PricingConfig};
pub use error::{CoreError, CoreResult, ErrorCode};
pub use invoice::{InvoiceNumberSource, InvoiceSequence};
pub use ledger::{BucketTotals, DeltaKind, Ledger};
pub use migration::{RawOrder, migrate_all, migrate_legacy_status};
pub use order::{NewOrder, Order, OrderEdit, OrderIdentity, PaymentMethod, PaymentStatus, PreparationType};
pub use pricing::{PriceBreakdown, PricingEngine};
pub use query::{BucketedOrders, DateRange, OrderQuery, filter};
