//! amtools - activity manager developer tools
//!
//! Resolves editor-completion compiler flags from a compilation database
//! and dumps activity-ranking week scores from SQLite.

// Safety lints
#![deny(unsafe_code)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Panic prevention in library code
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

// Keep functions small
#![warn(clippy::cognitive_complexity)]
#![warn(clippy::too_many_arguments)]
#![warn(clippy::too_many_lines)]

pub mod compdb;
pub mod config;
pub mod doctor;
pub mod flags;
pub mod scores;
