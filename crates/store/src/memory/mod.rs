//! In-memory document store
//!
//! Holds every tenant collection in process memory behind a single
//! `parking_lot::RwLock`. Only the three tenant collections
//! (`clients/{tenantId}/{attendees|sessions|speakers}`) are backed by a map;
//! every other path resolves to a detached collection that reads as empty and
//! rejects writes with [`Error::NotInitialized`].
//!
//! # Ids
//!
//! Generated ids have the shape `doc_{counter}_{nanos}`. The counter is
//! per store and advanced under the write lock, so ids never repeat within
//! one store.
//!
//! # Views
//!
//! `filter` and `limit` materialize a snapshot of the matching documents at
//! call time. Later writes to the collection are not visible through an
//! existing view. Writes issued through a view land in the collection the
//! view was taken from.

mod handles;
mod query;

pub use handles::{MemoryCollectionRef, MemoryDocumentIter, MemoryDocumentRef, MemorySnapshot};

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use eventdesk_core::{Error, Fields, Result, COLLECTIONS};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::facade::{CollectionRef, DocumentStore, TENANT_SCOPE};

/// Documents of one collection, keyed by id
pub(crate) type DocMap = FxHashMap<String, Fields>;

#[derive(Debug)]
struct State {
    tables: FxHashMap<&'static str, DocMap>,
    next_id: u64,
}

/// State shared by a store and every handle derived from it.
#[derive(Debug)]
pub(crate) struct Shared {
    tenant_id: String,
    state: RwLock<State>,
}

impl Shared {
    /// Name of the backing table when `path` is one of the tenant
    /// collections, `None` for detached paths.
    pub(crate) fn resolve(&self, path: &str) -> Option<&'static str> {
        let mut segments = path.split('/');
        let scope = segments.next()?;
        let tenant = segments.next()?;
        let name = segments.next()?;
        if segments.next().is_some() || scope != TENANT_SCOPE || tenant != self.tenant_id {
            return None;
        }
        COLLECTIONS.iter().copied().find(|c| *c == name)
    }

    /// Copy of every document in `table`.
    pub(crate) fn read_table(&self, table: &str) -> DocMap {
        let state = self.state.read();
        state.tables.get(table).cloned().unwrap_or_default()
    }

    pub(crate) fn read_doc(&self, table: &str, id: &str) -> Option<Fields> {
        let state = self.state.read();
        state.tables.get(table).and_then(|docs| docs.get(id)).cloned()
    }

    /// Insert `fields` under a fresh id and return the id.
    pub(crate) fn insert_new(&self, table: &'static str, fields: Fields) -> String {
        let mut state = self.state.write();
        let id = format!(
            "doc_{}_{}",
            state.next_id,
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        state.next_id += 1;
        state
            .tables
            .entry(table)
            .or_default()
            .insert(id.clone(), fields);
        id
    }

    pub(crate) fn write_doc(&self, table: &'static str, id: &str, fields: Fields) {
        let mut state = self.state.write();
        state
            .tables
            .entry(table)
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Returns whether a document was removed.
    pub(crate) fn remove_doc(&self, table: &str, id: &str) -> bool {
        let mut state = self.state.write();
        state
            .tables
            .get_mut(table)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false)
    }
}

/// Process-local document store for one tenant.
///
/// Cloning is cheap; clones share the same data.
#[derive(Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// Create an empty store whose tenant collections live under
    /// `clients/{tenant_id}`.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        let tenant_id = tenant_id.into();
        let tables = COLLECTIONS
            .iter()
            .map(|name| (*name, DocMap::default()))
            .collect();
        debug!(tenant = %tenant_id, "Created in-memory document store");
        Self {
            shared: Arc::new(Shared {
                tenant_id,
                state: RwLock::new(State { tables, next_id: 1 }),
            }),
        }
    }

    /// Number of documents stored in the tenant collection `name`.
    ///
    /// Detached names always report zero.
    pub fn len(&self, name: &str) -> usize {
        let state = self.shared.state.read();
        state.tables.get(name).map(|docs| docs.len()).unwrap_or(0)
    }

    /// True when no tenant collection holds a document.
    pub fn is_empty(&self) -> bool {
        let state = self.shared.state.read();
        state.tables.values().all(|docs| docs.is_empty())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("tenant_id", &self.shared.tenant_id)
            .finish_non_exhaustive()
    }
}

impl DocumentStore for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn tenant_id(&self) -> &str {
        &self.shared.tenant_id
    }

    fn root(&self, name: &str) -> Box<dyn CollectionRef> {
        Box::new(MemoryCollectionRef::new(
            Arc::clone(&self.shared),
            name.to_string(),
        ))
    }
}

pub(crate) fn not_initialized(path: &str) -> Error {
    debug!(path, "Write to detached collection rejected");
    Error::not_initialized(path)
}

pub(crate) fn ensure_live(shared: &Shared, path: &str) -> Result<&'static str> {
    shared.resolve(path).ok_or_else(|| not_initialized(path))
}
