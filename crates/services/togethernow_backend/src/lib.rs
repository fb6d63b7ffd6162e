// --- File: crates/services/togethernow_backend/src/lib.rs ---
pub mod router;
pub mod seed;
pub mod service_factory;

pub use router::build_router;
pub use service_factory::{build_state, connect_services};
