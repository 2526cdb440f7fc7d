//! Filter/query layer
//!
//! Splits a collection into the three buckets, then narrows each bucket by a
//! text query and a calendar-date range. Read-only; bucket membership comes
//! from the classifier alone and is never changed by a filter.

use crate::classify::{Bucket, classify};
use crate::order::Order;
use crate::util::calendar_date;
use chrono::{Datelike, Days, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Date range selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Yesterday,
    /// Today and the six days before it
    LastSevenDays,
    /// Same calendar month and year as today
    ThisMonth,
}

impl DateRange {
    /// Whether an order's calendar date falls in the range
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Today => date == today,
            Self::Yesterday => today.checked_sub_days(Days::new(1)) == Some(date),
            Self::LastSevenDays => today
                .checked_sub_days(Days::new(6))
                .is_some_and(|start| date >= start),
            Self::ThisMonth => date.year() == today.year() && date.month() == today.month(),
        }
    }
}

/// Search criteria from the list views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    /// Free text; empty matches everything
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub date_range: DateRange,
}

impl OrderQuery {
    pub fn new(text: impl Into<String>, date_range: DateRange) -> Self {
        Self {
            text: text.into(),
            date_range,
        }
    }

    /// Case-insensitive match on customer name, literal match on invoice
    /// number or phone
    pub fn matches_text(&self, order: &Order) -> bool {
        if self.text.is_empty() {
            return true;
        }
        order
            .customer_name
            .to_lowercase()
            .contains(&self.text.to_lowercase())
            || order.invoice_number.contains(&self.text)
            || order.customer_phone.contains(&self.text)
    }

    /// Text and date criteria combined
    pub fn matches(&self, order: &Order, today: NaiveDate, tz: Tz) -> bool {
        self.matches_text(order)
            && (self.date_range == DateRange::All
                || self
                    .date_range
                    .contains(calendar_date(order.timestamp, tz), today))
    }
}

/// Filtered orders per bucket, in collection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketedOrders<'a> {
    pub office: Vec<&'a Order>,
    pub active: Vec<&'a Order>,
    pub archived: Vec<&'a Order>,
}

impl<'a> BucketedOrders<'a> {
    pub fn get(&self, bucket: Bucket) -> &[&'a Order] {
        match bucket {
            Bucket::Office => &self.office,
            Bucket::Active => &self.active,
            Bucket::Archived => &self.archived,
        }
    }

    /// Per-bucket counts (tab badges)
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            office: self.office.len(),
            active: self.active.len(),
            archived: self.archived.len(),
        }
    }
}

/// Number of filtered orders per bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub office: usize,
    pub active: usize,
    pub archived: usize,
}

/// Classify then filter a collection
pub fn filter<'a>(
    orders: &'a [Order],
    query: &OrderQuery,
    today: NaiveDate,
    tz: Tz,
) -> BucketedOrders<'a> {
    let mut out = BucketedOrders::default();
    for order in orders {
        let bucket = classify(order);
        if !query.matches(order, today, tz) {
            continue;
        }
        match bucket {
            Bucket::Office => out.office.push(order),
            Bucket::Active => out.active.push(order),
            Bucket::Archived => out.archived.push(order),
        }
    }
    out
}
