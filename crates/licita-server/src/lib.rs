//! HTTP API for licita.
//!
//! Routes:
//! - `POST /api/extract`: multipart upload (field `file`), returns the
//!   cleaned text and its statistics
//! - `POST /api/analyze`: `{ "text": ... }`, returns the structured tender
//!   analysis
//! - `GET /health`
//!
//! Every failure is answered with an [`licita_core::ErrorReport`] body and
//! the status class of its category.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::AppState;
