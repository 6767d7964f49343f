//! Orchestrator domain
//!
//! Entities and repository contracts live in `bearded_core::domain`; this
//! module only holds the service seams owned by the orchestrator.

pub mod services;

pub use services::*;
