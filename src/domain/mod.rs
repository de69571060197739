//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//! - [`clock`] - Injectable time source
//! - [`rate_window`] - Fixed-window counter state and its store contract
//!
//! # Click Processing Flow
//!
//! 1. A redirect or tracking request passes admission control
//! 2. [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`click_worker::run_click_worker`] persists it with retry
//! 4. [`repositories::ClickRepository`] increments the counter and appends the event

pub mod click_event;
pub mod click_worker;
pub mod clock;
pub mod entities;
pub mod rate_window;
pub mod repositories;
