//! Scan domain module
//!
//! The scan aggregate, its sessions, the shared status state machine and the
//! repository contract used to persist them.

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use value_objects::*;
