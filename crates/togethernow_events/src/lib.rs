// --- File: crates/togethernow_events/src/lib.rs ---
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;


pub use routes::routes;
