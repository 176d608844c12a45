//! Product catalog integration.
//!
//! # Data Flow
//! ```text
//! Route handler
//!     → client.rs (caller override or configured URL, GET)
//!     → upstream::UpstreamClient (send, status check, JSON)
//!     → contract::decode_products (array of Product)
//! ```

pub mod client;

pub use client::CatalogClient;
