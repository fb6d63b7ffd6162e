//! Cloud Firestore REST v1 implementation of `DocumentStore`.

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use togethernow_common::shared_client;
use togethernow_config::FirebaseConfig;
use togethernow_store::{
    BoxFuture, CollectionRef, Direction, Document, DocumentRef, DocumentStore, FieldUpdate, Fields,
    Filter, Query, SetMode, StoreError,
};
use tracing::{debug, instrument};

use super::value::{decode_fields, encode_fields, encode_value, quote_field_path};
use crate::auth::AccessTokenProvider;
use crate::error::{api_error, FirebaseError};

const LIST_PAGE_SIZE: &str = "300";

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Option<Value>,
}

impl RawDocument {
    fn into_document(self) -> Result<Document, FirebaseError> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Document::new(id, decode_fields(self.fields.as_ref())?))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunQueryResponse {
    #[serde(default)]
    document: Option<RawDocument>,
}

/// A `DocumentStore` backed by a Firestore database.
pub struct FirestoreStore {
    client: Client,
    endpoint: Url,
    project_id: String,
    database_id: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl FirestoreStore {
    pub fn new(
        config: &FirebaseConfig,
        project_id: impl Into<String>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, FirebaseError> {
        let endpoint = Url::parse(&config.firestore_endpoint).map_err(|e| {
            FirebaseError::ConfigError(format!(
                "Invalid firestore_endpoint {}: {}",
                config.firestore_endpoint, e
            ))
        })?;
        Ok(Self {
            client: shared_client(),
            endpoint,
            project_id: project_id.into(),
            database_id: config.database_id.clone(),
            tokens,
        })
    }

    fn document_name(&self, path: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{}",
            self.project_id, self.database_id, path
        )
    }

    /// `.../documents/{path}`, with `:{action}` appended to the last segment.
    fn documents_url(&self, path: &str, action: Option<&str>) -> Result<Url, FirebaseError> {
        let mut segments: Vec<String> = std::iter::once("documents")
            .chain(path.split('/').filter(|s| !s.is_empty()))
            .map(str::to_string)
            .collect();
        if let (Some(action), Some(last)) = (action, segments.last_mut()) {
            last.push(':');
            last.push_str(action);
        }

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FirebaseError::ConfigError(format!("{} cannot be a base URL", self.endpoint))
            })?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database_id.as_str(),
            ])
            .extend(&segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, FirebaseError> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }

    #[instrument(skip(self), fields(path = %doc))]
    async fn get_document(&self, doc: &DocumentRef) -> Result<Option<Document>, FirebaseError> {
        let url = self.documents_url(doc.path(), None)?;
        match self.send(self.client.get(url)).await {
            Ok(response) => {
                let raw: RawDocument = response.json().await?;
                Ok(Some(raw.into_document()?))
            }
            Err(FirebaseError::ApiError { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, data), fields(path = %doc))]
    async fn set_document(
        &self,
        doc: &DocumentRef,
        data: Fields,
        mode: SetMode,
    ) -> Result<(), FirebaseError> {
        let mut url = self.documents_url(doc.path(), None)?;
        if mode == SetMode::Merge {
            if data.is_empty() {
                // A PATCH without a mask would clear the document.
                if self.get_document(doc).await?.is_some() {
                    return Ok(());
                }
            } else {
                let mut query = url.query_pairs_mut();
                for field in data.keys() {
                    query.append_pair("updateMask.fieldPaths", &quote_field_path(field));
                }
            }
        }

        let body = json!({ "fields": encode_fields(&data) });
        self.send(self.client.patch(url).json(&body)).await?;
        debug!("Document written");
        Ok(())
    }

    async fn add_document(
        &self,
        collection: &CollectionRef,
        data: Fields,
    ) -> Result<String, FirebaseError> {
        let url = self.documents_url(collection.path(), None)?;
        let body = json!({ "fields": encode_fields(&data) });
        let raw: RawDocument = self
            .send(self.client.post(url).json(&body))
            .await?
            .json()
            .await?;
        let doc = raw.into_document()?;
        debug!("Created {}/{}", collection, doc.id);
        Ok(doc.id)
    }

    #[instrument(skip(self, updates), fields(path = %doc))]
    async fn update_document(
        &self,
        doc: &DocumentRef,
        updates: Vec<FieldUpdate>,
    ) -> Result<(), FirebaseError> {
        let mut fields = Map::new();
        let mut mask = Vec::new();
        let mut transforms = Vec::new();

        for update in updates {
            match update {
                FieldUpdate::Set { field, value } => {
                    mask.push(quote_field_path(&field));
                    fields.insert(field, encode_value(&value));
                }
                FieldUpdate::ArrayUnion { field, elements } => transforms.push(json!({
                    "fieldPath": quote_field_path(&field),
                    "appendMissingElements": { "values": elements.iter().map(encode_value).collect::<Vec<_>>() }
                })),
                FieldUpdate::ArrayRemove { field, elements } => transforms.push(json!({
                    "fieldPath": quote_field_path(&field),
                    "removeAllFromArray": { "values": elements.iter().map(encode_value).collect::<Vec<_>>() }
                })),
                FieldUpdate::Increment { field, by } => transforms.push(json!({
                    "fieldPath": quote_field_path(&field),
                    "increment": { "integerValue": by.to_string() }
                })),
            }
        }

        let write = json!({
            "update": { "name": self.document_name(doc.path()), "fields": fields },
            "updateMask": { "fieldPaths": mask },
            "updateTransforms": transforms,
            "currentDocument": { "exists": true }
        });
        let url = self.documents_url("", Some("commit"))?;
        self.send(self.client.post(url).json(&json!({ "writes": [write] })))
            .await?;
        Ok(())
    }

    async fn delete_document(&self, doc: &DocumentRef) -> Result<(), FirebaseError> {
        let url = self.documents_url(doc.path(), None)?;
        match self.send(self.client.delete(url)).await {
            Ok(_) | Err(FirebaseError::ApiError { status: 404, .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn list_documents(&self, collection: &CollectionRef) -> Result<Vec<Document>, FirebaseError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.documents_url(collection.path(), None)?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", LIST_PAGE_SIZE);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: ListResponse = self.send(self.client.get(url)).await?.json().await?;
            for raw in page.documents {
                documents.push(raw.into_document()?);
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(documents)
    }

    #[instrument(skip(self, query), fields(collection = %query.collection))]
    async fn run_query(&self, query: &Query) -> Result<Vec<Document>, FirebaseError> {
        let parent = query
            .collection
            .parent()
            .map(|p| p.path().to_string())
            .unwrap_or_default();
        let url = self.documents_url(&parent, Some("runQuery"))?;

        let body = json!({ "structuredQuery": structured_query(query) });
        let rows: Vec<RunQueryResponse> = self
            .send(self.client.post(url).json(&body))
            .await?
            .json()
            .await?;

        rows.into_iter()
            .filter_map(|row| row.document)
            .map(RawDocument::into_document)
            .collect()
    }
}

fn structured_query(query: &Query) -> Value {
    let mut structured = json!({ "from": [{ "collectionId": query.collection.id() }] });

    let mut filters: Vec<Value> = query
        .filters
        .iter()
        .map(|filter| {
            let (op, value) = match filter {
                Filter::Equal { value, .. } => ("EQUAL", value),
                Filter::ArrayContains { value, .. } => ("ARRAY_CONTAINS", value),
            };
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": quote_field_path(filter.field()) },
                    "op": op,
                    "value": encode_value(value)
                }
            })
        })
        .collect();
    if filters.len() == 1 {
        structured["where"] = filters.remove(0);
    } else if !filters.is_empty() {
        structured["where"] = json!({ "compositeFilter": { "op": "AND", "filters": filters } });
    }

    if !query.order_by.is_empty() {
        let order: Vec<Value> = query
            .order_by
            .iter()
            .map(|o| {
                let direction = match o.direction {
                    Direction::Ascending => "ASCENDING",
                    Direction::Descending => "DESCENDING",
                };
                json!({ "field": { "fieldPath": quote_field_path(&o.field) }, "direction": direction })
            })
            .collect();
        structured["orderBy"] = Value::Array(order);
    }

    if let Some(limit) = query.limit {
        structured["limit"] = json!(limit);
    }
    structured
}

impl DocumentStore for FirestoreStore {
    fn get<'a>(&'a self, doc: &'a DocumentRef) -> BoxFuture<'a, Option<Document>, StoreError> {
        Box::pin(async move { Ok(self.get_document(doc).await?) })
    }

    fn set<'a>(
        &'a self,
        doc: &'a DocumentRef,
        data: Fields,
        mode: SetMode,
    ) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move { Ok(self.set_document(doc, data, mode).await?) })
    }

    fn add<'a>(
        &'a self,
        collection: &'a CollectionRef,
        data: Fields,
    ) -> BoxFuture<'a, String, StoreError> {
        Box::pin(async move { Ok(self.add_document(collection, data).await?) })
    }

    fn update<'a>(
        &'a self,
        doc: &'a DocumentRef,
        updates: Vec<FieldUpdate>,
    ) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move { Ok(self.update_document(doc, updates).await?) })
    }

    fn delete<'a>(&'a self, doc: &'a DocumentRef) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move { Ok(self.delete_document(doc).await?) })
    }

    fn list<'a>(
        &'a self,
        collection: &'a CollectionRef,
    ) -> BoxFuture<'a, Vec<Document>, StoreError> {
        Box::pin(async move { Ok(self.list_documents(collection).await?) })
    }

    fn query<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Vec<Document>, StoreError> {
        Box::pin(async move { Ok(self.run_query(query).await?) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    fn store() -> FirestoreStore {
        let config = FirebaseConfig {
            firestore_endpoint: "http://localhost:8080".to_string(),
            ..Default::default()
        };
        FirestoreStore::new(&config, "demo", Arc::new(StaticTokenProvider::new("owner"))).unwrap()
    }

    #[test]
    fn builds_document_and_action_urls() {
        let store = store();
        assert_eq!(
            store.documents_url("events/e1/messages", None).unwrap().as_str(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents/events/e1/messages"
        );
        assert_eq!(
            store.documents_url("events/e1", Some("runQuery")).unwrap().as_str(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents/events/e1:runQuery"
        );
        assert_eq!(
            store.documents_url("", Some("commit")).unwrap().as_str(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents:commit"
        );
    }

    #[test]
    fn structured_query_uses_single_filter_directly() {
        let events = CollectionRef::root("events").unwrap();
        let query = Query::new(events)
            .filter(Filter::array_contains("members", "u1"))
            .order_by("created_at", Direction::Descending)
            .limit(1);
        assert_eq!(
            structured_query(&query),
            json!({
                "from": [{"collectionId": "events"}],
                "where": {"fieldFilter": {
                    "field": {"fieldPath": "members"},
                    "op": "ARRAY_CONTAINS",
                    "value": {"stringValue": "u1"}
                }},
                "orderBy": [{"field": {"fieldPath": "created_at"}, "direction": "DESCENDING"}],
                "limit": 1
            })
        );
    }

    #[test]
    fn structured_query_combines_filters_with_and() {
        let reviews = CollectionRef::root("reviews").unwrap();
        let query = Query::new(reviews)
            .filter(Filter::equal("target_uid", "u1"))
            .filter(Filter::equal("rating", 5));
        let structured = structured_query(&query);
        assert_eq!(structured["where"]["compositeFilter"]["op"], "AND");
        assert_eq!(
            structured["where"]["compositeFilter"]["filters"]
                .as_array()
                .map(Vec::len),
            Some(2)
        );
        assert!(structured.get("orderBy").is_none());
    }
}
