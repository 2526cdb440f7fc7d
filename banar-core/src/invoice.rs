//! Invoice numbering
//!
//! The core treats invoice numbers as opaque strings assigned at intake. The
//! [`InvoiceNumberSource`] trait is the seam the intake workflow uses;
//! [`InvoiceSequence`] is the in-memory implementation it can persist by
//! storing [`InvoiceSequence::last_issued`].

use crate::config::DEFAULT_INVOICE_START;

/// Supplier of monotonically increasing invoice numbers
pub trait InvoiceNumberSource {
    fn next_invoice_number(&mut self) -> String;
}

/// Sequential invoice numbers with a floor
///
/// The next number is the last issued plus one, but never below `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSequence {
    start: u64,
    last: Option<u64>,
}

impl InvoiceSequence {
    /// Fresh sequence; the first number issued is `start`
    pub fn new(start: u64) -> Self {
        Self { start, last: None }
    }

    /// Resume from a previously stored last-issued value
    ///
    /// Unparseable stored values are treated as absent.
    pub fn resume(start: u64, stored_last: Option<&str>) -> Self {
        let last = stored_last.and_then(|s| match s.trim().parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::warn!(stored = s, "Ignoring unparseable last invoice number");
                None
            }
        });
        Self { start, last }
    }

    /// Last number issued, for persistence
    pub fn last_issued(&self) -> Option<u64> {
        self.last
    }
}

impl Default for InvoiceSequence {
    fn default() -> Self {
        Self::new(DEFAULT_INVOICE_START)
    }
}

impl InvoiceNumberSource for InvoiceSequence {
    fn next_invoice_number(&mut self) -> String {
        let next = self
            .last
            .map(|n| n.saturating_add(1))
            .unwrap_or(self.start)
            .max(self.start);
        self.last = Some(next);
        next.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_floor() {
        let mut seq = InvoiceSequence::default();
        assert_eq!(seq.next_invoice_number(), "6311");
        assert_eq!(seq.next_invoice_number(), "6312");
        assert_eq!(seq.last_issued(), Some(6312));
    }

    #[test]
    fn test_resume_continues() {
        let mut seq = InvoiceSequence::resume(6311, Some("7000"));
        assert_eq!(seq.next_invoice_number(), "7001");
    }

    #[test]
    fn test_resume_below_floor_jumps_to_start() {
        let mut seq = InvoiceSequence::resume(6311, Some("120"));
        assert_eq!(seq.next_invoice_number(), "6311");
    }

    #[test]
    fn test_resume_garbage_starts_fresh() {
        let mut seq = InvoiceSequence::resume(6311, Some("abc"));
        assert_eq!(seq.next_invoice_number(), "6311");
    }
}
