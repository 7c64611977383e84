// Core modules
pub mod indicators;
pub mod models;
pub mod patterns;
pub mod strategy;

// Market data, caching and configuration
pub mod api;
pub mod cache;
pub mod settings;
pub mod synthetic;

// Re-export commonly used types
pub use models::*;
pub use strategy::{NoSignal, ScoringProfile, SignalEngine, Strategy};
