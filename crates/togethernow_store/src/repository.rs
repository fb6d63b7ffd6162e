//! The document store trait.
//!
//! This module defines the operations the application needs from a document
//! database. Route handlers only see `dyn DocumentStore`, which keeps them
//! independent of whether Firestore or the in-memory store is behind it.

use crate::document::{Document, Fields};
use crate::error::StoreError;
use crate::path::{CollectionRef, DocumentRef};
use crate::query::Query;
use crate::update::{FieldUpdate, SetMode};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A document database organised in collections and documents.
pub trait DocumentStore: Send + Sync {
    /// Reads a document, `None` if it does not exist.
    fn get<'a>(&'a self, doc: &'a DocumentRef) -> BoxFuture<'a, Option<Document>, StoreError>;

    /// Creates or replaces a document, or merges top-level fields into it.
    fn set<'a>(
        &'a self,
        doc: &'a DocumentRef,
        data: Fields,
        mode: SetMode,
    ) -> BoxFuture<'a, (), StoreError>;

    /// Creates a document with a generated id and returns the id.
    fn add<'a>(
        &'a self,
        collection: &'a CollectionRef,
        data: Fields,
    ) -> BoxFuture<'a, String, StoreError>;

    /// Applies field updates atomically.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the document does not exist.
    fn update<'a>(
        &'a self,
        doc: &'a DocumentRef,
        updates: Vec<FieldUpdate>,
    ) -> BoxFuture<'a, (), StoreError>;

    /// Deletes a document. Deleting a missing document is not an error.
    /// Subcollections are left in place.
    fn delete<'a>(&'a self, doc: &'a DocumentRef) -> BoxFuture<'a, (), StoreError>;

    /// All documents of a collection, ordered by id.
    fn list<'a>(&'a self, collection: &'a CollectionRef)
        -> BoxFuture<'a, Vec<Document>, StoreError>;

    /// Runs a structured query.
    fn query<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Vec<Document>, StoreError>;
}
