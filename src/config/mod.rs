//! Configuration location and loading for cfgboot.
//!
//! This module handles:
//! - Location cascade (store, environment, host parameters, fallback)
//! - Scheme normalization
//! - Properties file parsing
//! - Loading and re-reading the application configuration

pub mod cascade;
pub mod loader;
pub mod location;
pub mod parser;
pub mod types;

pub use cascade::{LocationResolver, LocationSource, ResolvedLocation};
pub use loader::{load, load_config, read_application_configuration};
pub use location::{LogConfigLocation, LogFormat, LogSource, Location};
pub use parser::{Properties, parse_properties, parse_properties_str};
pub use types::ConfigSettings;
