//! HTTP API around the Precis summarizers.
//!
//! # API Endpoints
//!
//! - `GET /api/create-abstract?url=<url>[&abstract_size=<n>]`: fetch a page
//!   and return `{ url, neural_network, sentence_extraction }`
//! - `POST /api/save?filename=<name>`: write the JSON body to
//!   `<output_dir>/<name>.json`
//! - `GET /health`: liveness
//!
//! Errors are returned as `{ "error": { "code", "message" } }`.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
