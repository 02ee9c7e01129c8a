//! The shared sort comparator.
//!
//! # Responsibilities
//! - Parse sort keys from query strings (closed set, explicit errors)
//! - Order catalog records by price or name, ascending or descending
//! - Serve both the proxy (raw JSON values) and SDK clients (typed records)
//!
//! # Design Decisions
//! - One comparator keyed by a closed enum; unrecognized keys are a parse
//!   error, never a silent no-op
//! - Name ordering is case-insensitive with a raw tie-break, so the result
//!   is deterministic across environments
//! - Records missing the sort key order after records that have it and keep
//!   their relative order (the sort is stable)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::types::Product;

/// Supported sort keys for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

/// Error returned when a sort key is not in the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized sort order: {0}")]
pub struct ParseSortOrderError(pub String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priceAsc" => Ok(SortOrder::PriceAsc),
            "priceDesc" => Ok(SortOrder::PriceDesc),
            "nameAsc" => Ok(SortOrder::NameAsc),
            "nameDesc" => Ok(SortOrder::NameDesc),
            other => Err(ParseSortOrderError(other.to_string())),
        }
    }
}

impl SortOrder {
    /// The wire spelling of this sort key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PriceAsc => "priceAsc",
            SortOrder::PriceDesc => "priceDesc",
            SortOrder::NameAsc => "nameAsc",
            SortOrder::NameDesc => "nameDesc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record the comparator knows how to order.
///
/// Implemented for raw JSON values (the proxy path) and typed products
/// (the SDK path), so both sides share one comparator.
pub trait SortRecord {
    /// Numeric price, if the record carries one.
    fn price(&self) -> Option<f64>;

    /// Product name, if the record carries one.
    fn name(&self) -> Option<&str>;
}

impl SortRecord for Value {
    fn price(&self) -> Option<f64> {
        self.get("price").and_then(Value::as_f64)
    }

    fn name(&self) -> Option<&str> {
        self.get("productName").and_then(Value::as_str)
    }
}

impl SortRecord for Product {
    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.product_name)
    }
}

/// Compare two records under the given sort key.
///
/// Missing keys rank after present ones regardless of direction.
pub fn compare<T: SortRecord>(a: &T, b: &T, order: SortOrder) -> Ordering {
    match order {
        SortOrder::PriceAsc => keyed(a.price(), b.price(), |x, y| x.total_cmp(y)),
        SortOrder::PriceDesc => keyed(a.price(), b.price(), |x, y| y.total_cmp(x)),
        SortOrder::NameAsc => keyed(a.name(), b.name(), |x, y| name_cmp(x, y)),
        SortOrder::NameDesc => keyed(a.name(), b.name(), |x, y| name_cmp(y, x)),
    }
}

/// Sort records in place under the given sort key. Stable.
pub fn sort_records<T: SortRecord>(records: &mut [T], order: SortOrder) {
    records.sort_by(|a, b| compare(a, b, order));
}

fn keyed<K, F>(a: Option<K>, b: Option<K>, cmp: F) -> Ordering
where
    F: Fn(&K, &K) -> Ordering,
{
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn name_cmp(a: &&str, b: &&str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
