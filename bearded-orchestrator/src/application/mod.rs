//! Orchestrator application layer

pub mod expander;
pub mod use_cases;
pub mod validation;

pub use expander::WorkflowExpander;
pub use use_cases::*;
pub use validation::{CreateScanCommand, ScanRequestValidator, ValidatedScanRequest};
