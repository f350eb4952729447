//! Background services.
//!
//! This module provides:
//! - `watcher`: debounced folder watcher feeding the intake queue
//! - `drain`: interval thread that classifies queued files

pub mod drain;
pub mod watcher;

pub use drain::*;
pub use watcher::*;
