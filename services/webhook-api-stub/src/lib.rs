//! In-memory stub of the webhook admin API.
//!
//! Serves the REST surface the console is written against, for local
//! development and integration tests. Not a delivery engine: messages are
//! seeded demo data and no webhook is ever invoked.

pub mod routes;
pub mod store;

pub use routes::app;
