//! Domain models for the farm dashboard

mod crop;
mod farm;
mod finance;
mod snapshot;
mod task;
mod weather;

pub use crop::*;
pub use farm::*;
pub use finance::*;
pub use snapshot::*;
pub use task::*;
pub use weather::*;
