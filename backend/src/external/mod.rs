//! External API integrations

pub mod narrative;

pub use narrative::NarrativeClient;
