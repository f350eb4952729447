//! Watched-folder pipeline for accounting PDF exports.
//!
//! Documents dropped into the watched folder are classified by filename
//! marker, their fields pulled from the text layer, and each one carried
//! through operator-confirmed rename and archive-move transitions.

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod intake;
pub mod lifecycle;
pub mod pipeline;
pub mod registry;
pub mod services;

pub use config::Settings;
pub use pipeline::{DrainReport, Pipeline};
