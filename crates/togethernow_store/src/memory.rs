//! In-process document store.
//!
//! Used by the `local` backend and by tests. Behaves like Firestore for the
//! operations the application uses: ids order listings, order-by skips
//! documents without the field, and deleting a document keeps its
//! subcollections.

use crate::document::{Document, Fields};
use crate::error::StoreError;
use crate::path::{CollectionRef, DocumentRef};
use crate::query::{compare_values, Direction, Query};
use crate::repository::{BoxFuture, DocumentStore};
use crate::update::{FieldUpdate, SetMode};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::trace;

type Collection = BTreeMap<String, Fields>;

/// A document store kept in memory; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &CollectionRef) -> usize {
        self.collections
            .read()
            .await
            .get(collection.path())
            .map_or(0, BTreeMap::len)
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..20].to_string()
}

fn sort_documents(docs: &mut [Document], query: &Query) {
    docs.sort_by(|a, b| {
        for order in &query.order_by {
            let ord = match (a.get(&order.field), b.get(&order.field)) {
                (Some(x), Some(y)) => compare_values(x, y),
                _ => Ordering::Equal,
            };
            let ord = match order.direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        let by_id = a.id.cmp(&b.id);
        match query.order_by.last().map(|o| o.direction) {
            Some(Direction::Descending) => by_id.reverse(),
            _ => by_id,
        }
    });
}

impl DocumentStore for MemoryStore {
    fn get<'a>(&'a self, doc: &'a DocumentRef) -> BoxFuture<'a, Option<Document>, StoreError> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections
                .get(doc.parent().path())
                .and_then(|c| c.get(doc.id()))
                .map(|data| Document::new(doc.id(), data.clone())))
        })
    }

    fn set<'a>(
        &'a self,
        doc: &'a DocumentRef,
        data: Fields,
        mode: SetMode,
    ) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            let collection = collections
                .entry(doc.parent().path().to_string())
                .or_default();
            match mode {
                SetMode::Overwrite => {
                    collection.insert(doc.id().to_string(), data);
                }
                SetMode::Merge => {
                    let existing = collection.entry(doc.id().to_string()).or_default();
                    existing.extend(data);
                }
            }
            trace!("set {}", doc);
            Ok(())
        })
    }

    fn add<'a>(
        &'a self,
        collection: &'a CollectionRef,
        data: Fields,
    ) -> BoxFuture<'a, String, StoreError> {
        Box::pin(async move {
            let id = generate_id();
            self.collections
                .write()
                .await
                .entry(collection.path().to_string())
                .or_default()
                .insert(id.clone(), data);
            trace!("added {}/{}", collection, id);
            Ok(id)
        })
    }

    fn update<'a>(
        &'a self,
        doc: &'a DocumentRef,
        updates: Vec<FieldUpdate>,
    ) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            let data = collections
                .get_mut(doc.parent().path())
                .and_then(|c| c.get_mut(doc.id()))
                .ok_or_else(|| StoreError::NotFound(doc.path().to_string()))?;
            for update in &updates {
                update.apply(data);
            }
            Ok(())
        })
    }

    fn delete<'a>(&'a self, doc: &'a DocumentRef) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move {
            if let Some(collection) = self.collections.write().await.get_mut(doc.parent().path()) {
                collection.remove(doc.id());
            }
            Ok(())
        })
    }

    fn list<'a>(
        &'a self,
        collection: &'a CollectionRef,
    ) -> BoxFuture<'a, Vec<Document>, StoreError> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections
                .get(collection.path())
                .map(|c| {
                    c.iter()
                        .map(|(id, data)| Document::new(id.clone(), data.clone()))
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn query<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Vec<Document>, StoreError> {
        Box::pin(async move {
            let mut docs: Vec<Document> = {
                let collections = self.collections.read().await;
                collections
                    .get(query.collection.path())
                    .map(|c| {
                        c.iter()
                            .filter(|(_, data)| query.filters.iter().all(|f| f.matches(data)))
                            .filter(|(_, data)| {
                                query
                                    .order_by
                                    .iter()
                                    .all(|order| data.contains_key(&order.field))
                            })
                            .map(|(id, data)| Document::new(id.clone(), data.clone()))
                            .collect()
                    })
                    .unwrap_or_default()
            };
            sort_documents(&mut docs, query);
            if let Some(limit) = query.limit {
                docs.truncate(limit as usize);
            }
            Ok(docs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::to_fields;
    use crate::query::Filter;
    use serde_json::{json, Value};

    fn fields(value: Value) -> Fields {
        to_fields(&value).unwrap()
    }

    fn events() -> CollectionRef {
        CollectionRef::root("events").unwrap()
    }

    #[tokio::test]
    async fn set_merge_keeps_existing_fields() {
        let store = MemoryStore::new();
        let doc = CollectionRef::root("users").unwrap().doc("alice").unwrap();

        store
            .set(&doc, fields(json!({"name": "Alice", "bio": ""})), SetMode::Overwrite)
            .await
            .unwrap();
        store
            .set(&doc, fields(json!({"bio": "climber"})), SetMode::Merge)
            .await
            .unwrap();

        let stored = store.get(&doc).await.unwrap().unwrap();
        assert_eq!(stored.data, fields(json!({"name": "Alice", "bio": "climber"})));

        store
            .set(&doc, fields(json!({"title": "Dr"})), SetMode::Overwrite)
            .await
            .unwrap();
        let stored = store.get(&doc).await.unwrap().unwrap();
        assert_eq!(stored.data, fields(json!({"title": "Dr"})));
    }

    #[tokio::test]
    async fn update_of_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let doc = events().doc("nope").unwrap();
        let err = store
            .update(&doc, vec![FieldUpdate::increment("current_people", 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(path) if path == "events/nope"));
    }

    #[tokio::test]
    async fn query_orders_filters_and_limits() {
        let store = MemoryStore::new();
        let coll = events();
        for (title, created, members) in [
            ("old", "2024-12-03T08:00:00.000000Z", json!(["bob"])),
            ("new", "2024-12-03T14:00:00.000000Z", json!(["alice"])),
            ("mid", "2024-12-03T12:00:00.000000Z", json!(["alice", "bob"])),
        ] {
            store
                .add(
                    &coll,
                    fields(json!({"title": title, "created_at": created, "members": members})),
                )
                .await
                .unwrap();
        }
        store
            .add(&coll, fields(json!({"title": "undated", "members": ["bob"]})))
            .await
            .unwrap();

        let newest_first = store
            .query(&Query::new(coll.clone()).order_by("created_at", Direction::Descending))
            .await
            .unwrap();
        let titles: Vec<_> = newest_first.iter().map(|d| d.get_str("title").unwrap()).collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);

        let bobs = store
            .query(
                &Query::new(coll)
                    .filter(Filter::array_contains("members", "bob"))
                    .limit(2),
            )
            .await
            .unwrap();
        assert_eq!(bobs.len(), 2);
        assert!(bobs
            .iter()
            .all(|d| d.get("members").unwrap().as_array().unwrap().contains(&json!("bob"))));
    }

    #[tokio::test]
    async fn deleting_a_document_keeps_its_subcollections() {
        let store = MemoryStore::new();
        let event = events().doc("e1").unwrap();
        let messages = event.collection("messages").unwrap();

        store
            .set(&event, fields(json!({"title": "t"})), SetMode::Overwrite)
            .await
            .unwrap();
        store
            .add(&messages, fields(json!({"message": "hi"})))
            .await
            .unwrap();
        store.delete(&event).await.unwrap();
        store.delete(&event).await.unwrap();

        assert!(store.get(&event).await.unwrap().is_none());
        assert_eq!(store.len(&messages).await, 1);
    }
}
