//! HTTP layer: shared state, route table, and request handlers

pub mod orders;
pub mod router;
pub mod state;
pub mod users;

pub use router::build_router;
pub use state::AppState;
