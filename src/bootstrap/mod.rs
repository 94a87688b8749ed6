//! Startup and shutdown for cfgboot.
//!
//! This module handles:
//! - The start/stop lifecycle and its phases
//! - Propagating `system.property.*` entries into the settings store
//! - Configuring the logging backend from the loaded configuration

pub mod lifecycle;
pub mod logging;
pub mod propagate;

pub use lifecycle::{Bootstrap, Phase, StartupReport};
pub use logging::{LoggingOutcome, configure_logging};
pub use propagate::propagate_properties;
