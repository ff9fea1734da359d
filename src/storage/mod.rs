//! Storage Layer
//!
//! Persistence for the analysis settings.

pub mod config;

pub use config::SettingsStore;
