//! Catalog proxy library.
//!
//! A thin proxy in front of a remote product-catalog API: inbound filter,
//! sort and limit parameters are translated to the upstream query dialect,
//! one GET is forwarded per request, and responses are optionally sorted
//! and truncated before being returned. The `catalog` module also carries
//! the sort comparator shared with the client SDK at `sdk/rust`.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod translate;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
