//! Bearded Orchestrator - scan creation and tracking service
//!
//! Turns a request naming a project, a target and a plan into a persisted
//! scan with one session per workflow step, and serves scans over HTTP.
//!
//! # Architecture
//!
//! ```text
//! bearded-orchestrator/
//! ├── domain/           # Dispatch seam
//! ├── application/      # Validation chain, workflow expander, use cases
//! ├── infrastructure/   # In-memory store, PostgreSQL repositories, dispatch
//! └── presentation/     # HTTP layer
//!     ├── auth/         # API key extractor and resolvers
//!     ├── controllers/  # Request handlers
//!     ├── models.rs     # DTOs with OpenAPI schemas
//!     └── routes.rs     # API route definitions
//! ```
//!
//! # API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/v1/scans` | GET | List scans |
//! | `/api/v1/scans` | POST | Create a scan |
//! | `/api/v1/scans/{id}` | GET | Get a scan |
//! | `/api/v1/scans/{id}` | DELETE | Delete a scan |
//! | `/health` | GET | Health check |

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
