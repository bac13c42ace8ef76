//! Shared utilities for fincrew crates

pub mod config;
pub mod logging;

pub use config::{EnvError, optional_env, require_env};
pub use logging::init_tracing;
