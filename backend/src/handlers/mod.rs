//! HTTP handlers for the farm risk dashboard

pub mod farm;
pub mod health;
pub mod risk;

pub use farm::*;
pub use health::*;
pub use risk::*;
