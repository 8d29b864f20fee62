//! Shared types and risk-scoring core for the farm risk dashboard
//!
//! This crate contains the pure computations shared between the backend,
//! the browser (via WASM), and any ingestion job: variance risk scoring,
//! deterministic synthetic farm seeding and the dashboard summary.

pub mod math;
pub mod models;
pub mod narrative;
pub mod scoring;
pub mod seeding;
pub mod summary;
pub mod types;
pub mod validation;

pub use models::*;
pub use narrative::*;
pub use scoring::*;
pub use seeding::*;
pub use summary::*;
pub use types::*;
pub use validation::*;
