//! Bearded Core - Foundation crate for the Bearded scan orchestrator
//!
//! # Modules
//!
//! - [`config`] - Strongly-typed configuration with file and environment variable support
//! - [`domain`] - Catalog entities, the scan aggregate and repository contracts
//! - [`logging`] - Structured logging with tracing
//!
//! # Configuration
//!
//! ```rust,ignore
//! use bearded_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `BEARDED__` prefix with double underscore separators:
//!
//! ```bash
//! BEARDED__SERVER__PORT=3000
//! BEARDED__STORAGE__BACKEND=postgres
//! ```
//!
//! # Logging
//!
//! ```rust,ignore
//! use bearded_core::init_tracing;
//!
//! init_tracing(&config.logging)?;
//! ```

pub mod config;
pub mod domain;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
