//! Domain Layer - Core business logic and entities
//!
//! The catalog (projects, targets, plans, plugins) is read-only input; the
//! scan aggregate is what the orchestrator produces from it.

pub mod catalog;
pub mod ids;
pub mod scan;

pub use catalog::*;
pub use ids::*;
pub use scan::*;
