//! Unified diff parsing, path classification, sanitization and token-budget truncation.
//!
//! Everything here works on the parsed [`parser::FileChange`] model: parse once,
//! then sanitize, assess risk and truncate before handing the diff to a
//! downstream consumer.

pub mod classify;
pub mod parser;
pub mod risk;
pub mod sanitize;
pub mod truncate;
