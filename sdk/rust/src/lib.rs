//! Client SDK for the catalog proxy.
//!
//! Embodies the browser application's data layer: one concurrent initial
//! load of categories, companies and products, an immutable filter state,
//! and a token-guarded filter application that re-sorts locally with the
//! comparator shared with the proxy.

pub mod aggregator;
pub mod client;

pub use aggregator::{filter_url, Aggregator, FilterState, LoadState, PRICE_CEILING};
pub use client::{CatalogClient, SdkError};

pub use catalog_proxy::catalog::{Category, Company, Product, SortOrder};
