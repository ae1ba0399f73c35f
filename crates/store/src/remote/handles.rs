//! Handle types of the remote store
//!
//! Handles hold a path and a shared client; nothing is sent until a read or
//! write is issued.

use std::sync::Arc;

use eventdesk_core::{Error, Fields, Result, Value};
use serde_json::Value as Json;
use tracing::debug;

use super::client::{Method, RestClient};
use super::query::RemoteQuery;
use super::wire::{decode_document, document_body, id_from_name};
use crate::facade::{CollectionRef, DocumentIter, DocumentRef, DocumentSnapshot, FilterOp};

/// Page size used when listing a whole collection
const LIST_PAGE_SIZE: &str = "300";

/// A remote collection, or a query over one.
#[derive(Debug, Clone)]
pub struct RemoteCollectionRef {
    client: Arc<RestClient>,
    path: String,
    query: Option<RemoteQuery>,
}

impl RemoteCollectionRef {
    pub(crate) fn new(client: Arc<RestClient>, path: String) -> Self {
        Self {
            client,
            path,
            query: None,
        }
    }

    /// Pending query, `None` for a plain collection.
    pub fn query(&self) -> Option<&RemoteQuery> {
        self.query.as_ref()
    }

    fn with_query(&self, query: RemoteQuery) -> Box<dyn CollectionRef> {
        Box::new(Self {
            client: Arc::clone(&self.client),
            path: self.path.clone(),
            query: Some(query),
        })
    }

    fn doc_ref(&self, id: &str) -> RemoteDocumentRef {
        RemoteDocumentRef::new(Arc::clone(&self.client), &self.path, id)
    }

    fn snapshot(&self, doc: &Json) -> Result<Box<dyn DocumentSnapshot>> {
        let (id, fields) = decode_document(doc)?;
        Ok(Box::new(RemoteSnapshot {
            reference: self.doc_ref(&id),
            fields,
        }))
    }

    fn list_all(&self) -> Result<Vec<Box<dyn DocumentSnapshot>>> {
        let url = self.client.url(&self.path);
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![("pageSize", LIST_PAGE_SIZE)];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }
            let page = self.client.send(Method::Get, &url, &params, None)?.into_json()?;

            if let Some(docs) = page.get("documents").and_then(Json::as_array) {
                for doc in docs {
                    out.push(self.snapshot(doc)?);
                }
            }
            match page.get("nextPageToken").and_then(Json::as_str) {
                Some(token) if !token.is_empty() => page_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(path = %self.path, count = out.len(), "Listed collection");
        Ok(out)
    }

    fn run_query(&self, query: &RemoteQuery) -> Result<Vec<Box<dyn DocumentSnapshot>>> {
        if query.limit() == Some(0) {
            return Ok(Vec::new());
        }
        let (parent, collection_id) = match self.path.rsplit_once('/') {
            Some((parent, id)) => (parent, id),
            None => ("", self.path.as_str()),
        };
        let url = format!("{}:runQuery", self.client.url(parent));
        let body = query.to_request(collection_id);
        let reply = self.client.send(Method::Post, &url, &[], Some(&body))?.into_json()?;

        // One element per result; elements without a document carry only
        // progress metadata.
        let rows = reply
            .as_array()
            .ok_or_else(|| Error::Protocol("runQuery response is not an array".to_string()))?;
        let out = rows
            .iter()
            .filter_map(|row| row.get("document"))
            .map(|doc| self.snapshot(doc))
            .collect::<Result<Vec<_>>>()?;

        debug!(path = %self.path, count = out.len(), "Ran structured query");
        Ok(out)
    }
}

impl CollectionRef for RemoteCollectionRef {
    fn id(&self) -> &str {
        id_from_name(&self.path)
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn parent(&self) -> Option<Box<dyn DocumentRef>> {
        let (doc_path, _) = self.path.rsplit_once('/')?;
        let (collection, id) = doc_path.rsplit_once('/')?;
        Some(Box::new(RemoteDocumentRef::new(
            Arc::clone(&self.client),
            collection,
            id,
        )))
    }

    fn documents(&self) -> Box<dyn DocumentIter> {
        Box::new(RemoteDocumentIter {
            collection: self.clone(),
        })
    }

    fn filter(&self, field: &str, op: FilterOp, value: Value) -> Box<dyn CollectionRef> {
        let query = self.query.clone().unwrap_or_default();
        self.with_query(query.and_filter(field, op, value))
    }

    fn limit(&self, n: usize) -> Box<dyn CollectionRef> {
        let query = self.query.clone().unwrap_or_default();
        self.with_query(query.with_limit(n))
    }

    fn add(&self, fields: Fields) -> Result<Box<dyn DocumentRef>> {
        let url = self.client.url(&self.path);
        let created = self
            .client
            .send(Method::Post, &url, &[], Some(&document_body(&fields)))?
            .into_json()?;
        let name = created
            .get("name")
            .and_then(Json::as_str)
            .ok_or_else(|| Error::Protocol("created document has no name".to_string()))?;
        Ok(Box::new(self.doc_ref(id_from_name(name))))
    }

    fn doc(&self, id: &str) -> Box<dyn DocumentRef> {
        Box::new(self.doc_ref(id))
    }
}

/// One remote document.
#[derive(Debug, Clone)]
pub struct RemoteDocumentRef {
    client: Arc<RestClient>,
    collection: String,
    id: String,
    path: String,
}

impl RemoteDocumentRef {
    fn new(client: Arc<RestClient>, collection: &str, id: &str) -> Self {
        Self {
            client,
            collection: collection.to_string(),
            id: id.to_string(),
            path: format!("{collection}/{id}"),
        }
    }
}

impl DocumentRef for RemoteDocumentRef {
    fn id(&self) -> &str {
        &self.id
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn parent(&self) -> Box<dyn CollectionRef> {
        Box::new(RemoteCollectionRef::new(
            Arc::clone(&self.client),
            self.collection.clone(),
        ))
    }

    fn get(&self) -> Result<Option<Box<dyn DocumentSnapshot>>> {
        let reply = self
            .client
            .send(Method::Get, &self.client.url(&self.path), &[], None)?;
        if reply.is_not_found() {
            return Ok(None);
        }
        let doc = reply.into_json()?;
        let (_, fields) = decode_document(&doc)?;
        Ok(Some(Box::new(RemoteSnapshot {
            reference: self.clone(),
            fields,
        })))
    }

    fn set(&self, fields: Fields) -> Result<()> {
        self.client
            .send(
                Method::Patch,
                &self.client.url(&self.path),
                &[],
                Some(&document_body(&fields)),
            )?
            .into_json()?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let reply = self
            .client
            .send(Method::Delete, &self.client.url(&self.path), &[], None)?;
        if reply.is_not_found() {
            return Ok(());
        }
        reply.into_json()?;
        Ok(())
    }

    fn collection(&self, name: &str) -> Box<dyn CollectionRef> {
        Box::new(RemoteCollectionRef::new(
            Arc::clone(&self.client),
            format!("{}/{name}", self.path),
        ))
    }
}

/// Fields of one remote document as read.
#[derive(Debug, Clone)]
pub struct RemoteSnapshot {
    reference: RemoteDocumentRef,
    fields: Fields,
}

impl DocumentSnapshot for RemoteSnapshot {
    fn id(&self) -> &str {
        &self.reference.id
    }

    fn reference(&self) -> Box<dyn DocumentRef> {
        Box::new(self.reference.clone())
    }

    fn fields(&self) -> &Fields {
        &self.fields
    }
}

/// Pending list or query call.
#[derive(Debug)]
pub struct RemoteDocumentIter {
    collection: RemoteCollectionRef,
}

impl DocumentIter for RemoteDocumentIter {
    fn get_all(self: Box<Self>) -> Result<Vec<Box<dyn DocumentSnapshot>>> {
        match &self.collection.query {
            Some(query) => self.collection.run_query(query),
            None => self.collection.list_all(),
        }
    }
}
