//! Catalog domain types and ordering.
//!
//! # Data Flow
//! ```text
//! upstream JSON arrays
//!     → types.rs (typed records, used by SDK consumers)
//!     → sort.rs (shared SortOrder comparator, used by proxy AND client)
//! ```
//!
//! # Design Decisions
//! - The proxy data path stays untyped (raw JSON values pass through);
//!   typed records exist for clients that need field access
//! - One comparator keyed by a closed enum, shared across both components
//! - IDs are accepted as JSON strings or numbers (upstream emits both)

pub mod sort;
pub mod types;

pub use sort::{sort_records, ParseSortOrderError, SortOrder, SortRecord};
pub use types::{Category, Company, Product};
