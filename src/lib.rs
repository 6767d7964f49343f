//! Bearded - scan orchestration service
//!
//! Binary crate that wires configuration, storage and the HTTP API together.

mod app;
mod shutdown;

pub use app::{AppError, AppHandle, create_app};
pub use shutdown::{ShutdownError, cancel_on_signal, serve_until_drained};
pub use bearded_core::{Config, init_tracing};
pub use bearded_orchestrator::presentation::controllers::OrchestratorState;

// Re-export for convenience
pub use bearded_core;
pub use bearded_orchestrator;
