//! Headless CMS integration.
//!
//! # Data Flow
//! ```text
//! Route handler
//!     → adapter.rs (endpoint resolution, access mode, auth header)
//!     → upstream::UpstreamClient (send, status check, JSON)
//!     → schema.rs (upstream shape → HeroBannerContent / HomeContent)
//! ```
//!
//! # Design Decisions
//! - Access mode is a tagged variant fixed at construction
//! - The hero query is always a persisted GET, whatever the mode
//! - No state is kept between calls

pub mod adapter;
pub mod schema;

pub use adapter::{CmsAdapter, FetchOptions, HomeStrategy};
