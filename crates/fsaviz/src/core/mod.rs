//! Core building blocks shared by the automaton editor
//!
//! Value types, errors, configuration, logging setup, the save-format
//! literal parsers and the curve geometry solver.

pub mod chumsky_utils;
mod config;
mod error;
pub mod geometry;
pub mod logging;
mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
