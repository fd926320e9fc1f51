//! Shared types, models and derived views for the farm dashboard
//!
//! Everything in this crate is pure: no I/O, no clocks. It is used by the
//! backend services and compiled to WebAssembly for the browser dashboard.

pub mod models;
pub mod types;
pub mod validation;
pub mod views;

pub use models::*;
pub use types::*;
pub use validation::*;
pub use views::*;
