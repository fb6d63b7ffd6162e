//! Document storage for TogetherNow
//!
//! This crate defines the `DocumentStore` trait the route handlers use to
//! read and write documents, together with the value types it works with
//! (paths, documents, queries and field updates). `MemoryStore` is the
//! in-process implementation; the Firestore implementation lives in
//! `togethernow-firebase`.
//!
//! # Example
//!
//! ```rust,no_run
//! use togethernow_store::{CollectionRef, DocumentStore, MemoryStore, SetMode};
//! use serde_json::json;
//!
//! async fn example() -> Result<(), togethernow_store::StoreError> {
//!     let store = MemoryStore::new();
//!     let users = CollectionRef::root("users")?;
//!     let alice = users.doc("alice")?;
//!     let data = togethernow_store::to_fields(&json!({"name": "Alice"}))?;
//!     store.set(&alice, data, SetMode::Merge).await?;
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod memory;
pub mod path;
pub mod query;
pub mod repository;
pub mod update;

pub use document::{to_fields, Document, Fields};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use path::{CollectionRef, DocumentRef};
pub use query::{compare_values, Direction, Filter, OrderBy, Query};
pub use repository::{BoxFuture, DocumentStore};
pub use update::{FieldUpdate, SetMode};
