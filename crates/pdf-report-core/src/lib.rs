//! pdf-report-core
//!
//! Pure domain types for maintenance-inspection reports: the normalized
//! report context, the status label formatter and output naming conventions.
//! No template engine or browser dependency.

pub mod error;
pub mod filenames;
pub mod models;
pub mod status;
pub mod time;
