// --- File: crates/togethernow_social/src/lib.rs ---
pub mod direct_messages;
pub mod doc;
pub mod friends;
pub mod handlers;
pub mod profiles;
pub mod reviews;
pub mod routes;

mod paths;

pub use routes::routes;
