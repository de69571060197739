//! In-process storage.
//!
//! [`MemoryStore`] backs every repository trait when no database is configured
//! and in the integration tests. [`DashMapWindowStore`] holds admission windows
//! for every deployment.

pub mod store;
pub mod window_store;

pub use store::MemoryStore;
pub use window_store::DashMapWindowStore;
