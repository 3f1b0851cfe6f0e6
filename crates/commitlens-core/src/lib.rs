//! Core types, configuration, and error handling for commitlens.
//!
//! This crate provides the shared foundation used by all other commitlens
//! crates:
//! - [`CommitlensError`] — unified error type using `thiserror`
//! - [`CommitlensConfig`] — configuration loaded from `.commitlens.toml`
//! - Shared types: [`Label`], [`Classification`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{AnalysisConfig, CommitlensConfig};
pub use error::CommitlensError;
pub use types::{Classification, Label, OutputFormat};

/// A convenience `Result` type for commitlens operations.
pub type Result<T> = std::result::Result<T, CommitlensError>;
