//! advert-board/crates/ab-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Advert-Board:
//! the advert lifecycle model, the persistence port, the error taxonomy,
//! and the authorization/transition service.

pub mod error;
pub mod models;
pub mod service;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use service::*;
pub use traits::*;
