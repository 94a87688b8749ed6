//! cfgboot - bootstrap an application's configuration and logging.
//!
//! This library provides the core functionality for cfgboot, including:
//! - Resolving the application configuration location through a cascade
//!   of settings store, environment variable, host parameter and fallback
//! - Reading `.properties` files from the filesystem or classpath roots
//! - Propagating `system.property.*` entries into the settings store
//! - Configuring a reloadable `tracing` backend from XML or properties files
//!
//! # Example
//!
//! ```no_run
//! use cfgboot::bootstrap::Bootstrap;
//! use cfgboot::diagnostics::Diagnostics;
//! use cfgboot::host::HostParams;
//! use cfgboot::logging::TracingBackend;
//! use cfgboot::resource::ClassPath;
//! use cfgboot::store::MemoryStore;
//! use std::sync::Arc;
//!
//! let mut boot = Bootstrap::new(
//!     Arc::new(MemoryStore::new()),
//!     ClassPath::new(vec![".".into()]),
//!     TracingBackend::install(),
//!     Diagnostics::stderr("app"),
//! );
//!
//! boot.on_start(&HostParams::new());
//! if let Some(report) = boot.report() {
//!     println!("Configuration location: {}", report.resolved.location);
//! }
//! boot.on_stop();
//! ```

pub mod bootstrap;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod host;
pub mod logging;
pub mod resource;
pub mod store;

pub use error::{BootError, Result};
