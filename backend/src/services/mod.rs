//! Business logic services for the farm risk dashboard

pub mod farm;

pub use farm::FarmService;
