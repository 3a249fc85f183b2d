//! Lexical signals over change-request metadata.
//!
//! - [`ghost`]: commits whose message does not match their diff
//! - [`title`]: vague change-request titles and suggested replacements
//! - [`tickets`]: work-tracker references in titles, bodies and commit messages

pub mod ghost;
pub mod tickets;
pub mod title;
