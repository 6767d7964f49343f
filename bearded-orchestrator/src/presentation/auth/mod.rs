//! Request authentication
//!
//! Handlers take an [`Auth`] argument; the caller's API key is resolved to an
//! owner id before the handler body runs.

pub mod extractors;
pub mod resolver;

pub use extractors::{Auth, AuthErrorResponse, AuthState};
pub use resolver::{AuthError, IdentityResolver, KeyConfigError, StaticApiKeyResolver};
