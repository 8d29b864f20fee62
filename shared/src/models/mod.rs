//! Domain models for the farm risk dashboard

mod dashboard;
mod farm;
mod grid;
mod risk;
mod zone;

pub use dashboard::*;
pub use farm::*;
pub use grid::*;
pub use risk::*;
pub use zone::*;
