//! Aggregation ledger
//!
//! Running per-bucket totals over the order collection, kept current by
//! applying one delta per mutation:
//! - create: `(None, Some(order))` adds the contribution
//! - delete: `(Some(order), None)` retracts it
//! - update: `(Some(old), Some(new))` retracts the old contribution from its
//!   bucket, then adds the new one to its (possibly different) bucket
//!
//! For every bucket the totals equal what [`Ledger::rescan`] computes over the
//! same collection. `rescan` exists for verification only; the mutation path
//! never walks the collection.
//!
//! The ledger remembers the last contribution it applied per order id. A
//! retraction must match that record exactly, so an order that was never
//! added, or a stale previous snapshot, is rejected instead of corrupting
//! the totals.

mod totals;

pub use totals::{BucketTotals, Contribution, TypeWeights};

use crate::classify::Bucket;
use crate::error::{CoreError, CoreResult};
use crate::order::Order;
use crate::pricing::PricingEngine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of mutation a delta represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeltaKind {
    Created,
    Updated,
    Deleted,
}

/// Incrementally maintained totals for the three buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    pub office: BucketTotals,
    pub active: BucketTotals,
    pub archived: BucketTotals,
    /// Applied contribution per order id
    #[serde(skip)]
    applied: HashMap<String, Contribution>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build by folding a creation delta over every loaded order
    pub fn rebuild<'a, I>(orders: I, engine: &PricingEngine) -> CoreResult<Self>
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut ledger = Self::new();
        for order in orders {
            ledger.apply_delta(None, Some(order), engine)?;
        }
        tracing::info!(
            orders = ledger.grand_total().order_count,
            "Ledger rebuilt from loaded orders"
        );
        Ok(ledger)
    }

    /// Full recomputation from scratch
    pub fn rescan(orders: &[Order], engine: &PricingEngine) -> CoreResult<Self> {
        let contributions = orders
            .iter()
            .map(|o| Contribution::of(o, engine))
            .collect::<CoreResult<Vec<_>>>()?;

        let mut ledger = Self::new();
        for bucket in Bucket::ALL {
            let totals = ledger.bucket_mut(bucket);
            for c in contributions.iter().filter(|c| c.bucket == bucket) {
                totals.add(c);
            }
        }
        ledger.applied = orders
            .iter()
            .map(|o| o.id.clone())
            .zip(contributions)
            .collect();
        Ok(ledger)
    }

    /// Compare against a full recomputation, logging any drift
    pub fn verify(&self, orders: &[Order], engine: &PricingEngine) -> bool {
        match Self::rescan(orders, engine) {
            Ok(expected) if expected == *self => true,
            Ok(expected) => {
                for bucket in Bucket::ALL {
                    if expected.bucket(bucket) != self.bucket(bucket) {
                        tracing::error!(
                            bucket = ?bucket,
                            expected = ?expected.bucket(bucket),
                            actual = ?self.bucket(bucket),
                            "Ledger drift detected"
                        );
                    }
                }
                if expected.applied != self.applied {
                    tracing::error!(
                        expected = expected.applied.len(),
                        actual = self.applied.len(),
                        "Ledger tracks a different set of orders"
                    );
                }
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Ledger verification failed on invalid order");
                false
            }
        }
    }

    /// Apply one mutation
    ///
    /// Both snapshots are validated before anything changes, so a rejected
    /// delta leaves the ledger as it was.
    pub fn apply_delta(
        &mut self,
        previous: Option<&Order>,
        next: Option<&Order>,
        engine: &PricingEngine,
    ) -> CoreResult<DeltaKind> {
        let kind = match (previous, next) {
            (None, None) => {
                tracing::error!("apply_delta called without previous or next order");
                return Err(CoreError::EmptyDelta);
            }
            (None, Some(_)) => DeltaKind::Created,
            (Some(_), None) => DeltaKind::Deleted,
            (Some(p), Some(n)) if p.id != n.id => {
                tracing::error!(previous = %p.id, next = %n.id, "apply_delta id mismatch");
                return Err(CoreError::IdMismatch {
                    previous: p.id.clone(),
                    next: n.id.clone(),
                });
            }
            (Some(_), Some(_)) => DeltaKind::Updated,
        };

        let retract = previous.map(|o| Contribution::of(o, engine)).transpose()?;
        let add = next.map(|o| Contribution::of(o, engine)).transpose()?;

        if let (Some(c), Some(order)) = (&retract, previous) {
            match self.applied.get(&order.id) {
                None => {
                    tracing::error!(order_id = %order.id, bucket = ?c.bucket, "Retracting untracked order");
                    return Err(CoreError::NotTracked(order.id.clone()));
                }
                Some(tracked) if tracked != c => {
                    tracing::error!(
                        order_id = %order.id,
                        tracked = ?tracked,
                        given = ?c,
                        "Previous snapshot differs from the applied one"
                    );
                    return Err(CoreError::StaleSnapshot(order.id.clone()));
                }
                Some(_) => {}
            }
        }
        if kind == DeltaKind::Created
            && let Some(order) = next
            && self.applied.contains_key(&order.id)
        {
            tracing::error!(order_id = %order.id, "Creating an order that is already tracked");
            return Err(CoreError::AlreadyTracked(order.id.clone()));
        }

        if let (Some(c), Some(order)) = (&retract, previous) {
            self.bucket_mut(c.bucket).retract(c);
            self.applied.remove(&order.id);
        }
        if let (Some(c), Some(order)) = (&add, next) {
            self.bucket_mut(c.bucket).add(c);
            self.applied.insert(order.id.clone(), c.clone());
        }

        let order_id = next.or(previous).map(|o| o.id.as_str()).unwrap_or_default();
        tracing::debug!(
            kind = ?kind,
            order_id = %order_id,
            from = ?retract.as_ref().map(|c| c.bucket),
            to = ?add.as_ref().map(|c| c.bucket),
            "Ledger delta applied"
        );
        Ok(kind)
    }

    /// Totals for one bucket
    pub fn bucket(&self, bucket: Bucket) -> &BucketTotals {
        match bucket {
            Bucket::Office => &self.office,
            Bucket::Active => &self.active,
            Bucket::Archived => &self.archived,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut BucketTotals {
        match bucket {
            Bucket::Office => &mut self.office,
            Bucket::Active => &mut self.active,
            Bucket::Archived => &mut self.archived,
        }
    }

    /// Revenue total of one bucket
    pub fn total(&self, bucket: Bucket) -> Decimal {
        self.bucket(bucket).revenue
    }

    /// Whether an order id currently contributes to the totals
    pub fn is_tracked(&self, order_id: &str) -> bool {
        self.applied.contains_key(order_id)
    }

    /// All three buckets merged
    pub fn grand_total(&self) -> BucketTotals {
        self.office.merged(&self.active).merged(&self.archived)
    }
}
