//! Inbound → upstream query translation.
//!
//! # Data Flow
//! ```text
//! inbound path + query params
//!     → query.rs (map recognized keys to the upstream dialect)
//!     → path.rs (render the upstream path variant, join with base URL)
//!     → one outbound GET per inbound request
//! ```
//!
//! # Design Decisions
//! - All six route variants share one translate-forward-sort-truncate
//!   pipeline; only the path template differs
//! - Translation is a pure function of the inbound request, trivially
//!   unit-testable without a server

pub mod path;
pub mod query;

pub use path::{build_upstream_url, UpstreamPath};
pub use query::{translate_query, ListQuery};
