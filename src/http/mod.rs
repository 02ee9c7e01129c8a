//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! inbound GET
//!     → server.rs (route binding, middleware, request ID)
//!     → translate (upstream URL)
//!     → upstream GET (shared reqwest client)
//!     → catalog::sort (optional post-processing)
//!     → JSON response, or the fixed 404/400/500 bodies from error.rs
//! ```

pub mod error;
pub mod request;
pub mod server;

pub use error::{ProxyError, ProxyResult};
pub use request::{RequestId, RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer, UpstreamSettings};
