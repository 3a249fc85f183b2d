//! Core types, configuration, and error handling for prlens.
//!
//! This crate provides the shared foundation used by all other prlens crates:
//! - [`PrlensError`]: unified error type using `thiserror`
//! - [`PrlensConfig`]: configuration loaded from `.prlens.toml`
//! - Shared types: [`ChangeType`], [`RiskTier`], [`CommitRecord`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{
    BudgetConfig, GhostConfig, PrlensConfig, RiskConfig, RiskLabels, SanitizeConfig,
    TicketConfig, TitleConfig,
};
pub use error::PrlensError;
pub use types::{ChangeType, CommitRecord, OutputFormat, RiskTier};

/// A convenience `Result` type for prlens operations.
pub type Result<T> = std::result::Result<T, PrlensError>;
