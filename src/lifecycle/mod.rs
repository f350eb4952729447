//! Document lifecycle.
//!
//! This module provides:
//! - `record`: the document record data model and its states
//! - `destination`: archive roots and date partitioning
//! - `store`: the in-memory store executing rename/move transitions

pub mod destination;
pub mod record;
pub mod store;

pub use destination::*;
pub use record::*;
pub use store::*;
