//! Cloud Firestore over its REST API.

mod client;
pub mod value;

pub use client::FirestoreStore;
