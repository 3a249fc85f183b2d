//! End-to-end change analysis.
//!
//! [`pipeline::AnalysisPipeline`] wires the diff and signal crates together:
//! parse, sanitize, assess risk, truncate to a token budget, then run ghost
//! commit, title and ticket detection over the same input.

pub mod pipeline;
