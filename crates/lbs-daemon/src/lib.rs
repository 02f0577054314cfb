//! lbs-daemon library target.
//!
//! Exposes the status router, shared state, the sync scheduler and the
//! production wiring for the binary, `lbs-cli` and integration tests.

pub mod api_types;
pub mod routes;
pub mod scheduler;
pub mod state;
pub mod wiring;
