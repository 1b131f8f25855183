//! Core types and utilities for the Eco-Grid predator/prey simulation.

pub mod census;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod types;

pub use census::*;
pub use config::*;
pub use error::{Error, Result};
pub use types::*;
