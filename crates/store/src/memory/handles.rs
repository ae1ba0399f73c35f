//! Handle types of the in-memory store
//!
//! Every handle is a path plus a shared pointer to the store state. The
//! backing table is resolved from the path on each access.

use std::sync::Arc;

use eventdesk_core::{Fields, Result, Value};

use super::query::{filter_docs, limit_docs};
use super::{ensure_live, DocMap, Shared};
use crate::facade::{CollectionRef, DocumentIter, DocumentRef, DocumentSnapshot, FilterOp};

/// A collection, or a materialized view over one.
#[derive(Debug, Clone)]
pub struct MemoryCollectionRef {
    shared: Arc<Shared>,
    path: String,
    view: Option<Arc<DocMap>>,
}

impl MemoryCollectionRef {
    pub(crate) fn new(shared: Arc<Shared>, path: String) -> Self {
        Self {
            shared,
            path,
            view: None,
        }
    }

    /// Documents currently in scope.
    fn current(&self) -> Arc<DocMap> {
        match &self.view {
            Some(docs) => Arc::clone(docs),
            None => Arc::new(match self.shared.resolve(&self.path) {
                Some(table) => self.shared.read_table(table),
                None => DocMap::default(),
            }),
        }
    }

    fn with_view(&self, docs: DocMap) -> Box<dyn CollectionRef> {
        Box::new(Self {
            shared: Arc::clone(&self.shared),
            path: self.path.clone(),
            view: Some(Arc::new(docs)),
        })
    }

    fn doc_ref(&self, id: &str) -> MemoryDocumentRef {
        MemoryDocumentRef::new(Arc::clone(&self.shared), &self.path, id)
    }
}

impl CollectionRef for MemoryCollectionRef {
    fn id(&self) -> &str {
        last_segment(&self.path)
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn parent(&self) -> Option<Box<dyn DocumentRef>> {
        let (doc_path, _) = self.path.rsplit_once('/')?;
        let (collection, id) = doc_path.rsplit_once('/')?;
        Some(Box::new(MemoryDocumentRef::new(
            Arc::clone(&self.shared),
            collection,
            id,
        )))
    }

    fn documents(&self) -> Box<dyn DocumentIter> {
        Box::new(MemoryDocumentIter {
            collection: self.clone(),
        })
    }

    fn filter(&self, field: &str, op: FilterOp, value: Value) -> Box<dyn CollectionRef> {
        self.with_view(filter_docs(&self.current(), field, op, &value))
    }

    fn limit(&self, n: usize) -> Box<dyn CollectionRef> {
        self.with_view(limit_docs(&self.current(), n))
    }

    fn add(&self, fields: Fields) -> Result<Box<dyn DocumentRef>> {
        let table = ensure_live(&self.shared, &self.path)?;
        let id = self.shared.insert_new(table, fields);
        Ok(Box::new(self.doc_ref(&id)))
    }

    fn doc(&self, id: &str) -> Box<dyn DocumentRef> {
        Box::new(self.doc_ref(id))
    }
}

/// One document id inside a collection.
#[derive(Debug, Clone)]
pub struct MemoryDocumentRef {
    shared: Arc<Shared>,
    collection: String,
    id: String,
    path: String,
}

impl MemoryDocumentRef {
    fn new(shared: Arc<Shared>, collection: &str, id: &str) -> Self {
        Self {
            shared,
            collection: collection.to_string(),
            id: id.to_string(),
            path: format!("{collection}/{id}"),
        }
    }
}

impl DocumentRef for MemoryDocumentRef {
    fn id(&self) -> &str {
        &self.id
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn parent(&self) -> Box<dyn CollectionRef> {
        Box::new(MemoryCollectionRef::new(
            Arc::clone(&self.shared),
            self.collection.clone(),
        ))
    }

    fn get(&self) -> Result<Option<Box<dyn DocumentSnapshot>>> {
        let Some(table) = self.shared.resolve(&self.collection) else {
            return Ok(None);
        };
        Ok(self.shared.read_doc(table, &self.id).map(|fields| {
            Box::new(MemorySnapshot {
                reference: self.clone(),
                fields,
            }) as Box<dyn DocumentSnapshot>
        }))
    }

    fn set(&self, fields: Fields) -> Result<()> {
        let table = ensure_live(&self.shared, &self.collection)?;
        self.shared.write_doc(table, &self.id, fields);
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if let Some(table) = self.shared.resolve(&self.collection) {
            self.shared.remove_doc(table, &self.id);
        }
        Ok(())
    }

    fn collection(&self, name: &str) -> Box<dyn CollectionRef> {
        Box::new(MemoryCollectionRef::new(
            Arc::clone(&self.shared),
            format!("{}/{name}", self.path),
        ))
    }
}

/// Fields of one document, copied out under the read lock.
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    reference: MemoryDocumentRef,
    fields: Fields,
}

impl DocumentSnapshot for MemorySnapshot {
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

/// Pending read of a collection or view.
#[derive(Debug)]
pub struct MemoryDocumentIter {
    collection: MemoryCollectionRef,
}

impl DocumentIter for MemoryDocumentIter {
    fn get_all(self: Box<Self>) -> Result<Vec<Box<dyn DocumentSnapshot>>> {
        let docs = self.collection.current();
        Ok(docs
            .iter()
            .map(|(id, fields)| {
                Box::new(MemorySnapshot {
                    reference: self.collection.doc_ref(id),
                    fields: fields.clone(),
                }) as Box<dyn DocumentSnapshot>
            })
            .collect())
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
