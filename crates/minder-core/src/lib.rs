//! Core types for minder.
//!
//! This crate holds the pieces shared by the file operation engine and the
//! command shell: the error taxonomy every operation reports through, and
//! the statically-typed engine configuration passed into each engine call.

mod config;
mod error;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use error::{OpError, Result};
