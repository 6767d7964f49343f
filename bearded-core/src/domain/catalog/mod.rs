//! Catalog domain module
//!
//! Projects, targets, plans and plugins. This crate only reads them; their
//! lifecycle is owned elsewhere.

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use value_objects::*;
