//! Reference façade over document stores
//!
//! Call sites hold these handles and never learn which backend serves them:
//!
//! | Handle | Locates | Backends |
//! |--------|---------|----------|
//! | [`CollectionRef`] | a collection, or a filtered/limited view of one | memory, remote |
//! | [`DocumentRef`] | one document id inside a collection | memory, remote |
//! | [`DocumentSnapshot`] | fields read from one document | memory, remote |
//! | [`DocumentIter`] | a pending read of a collection or view | memory, remote |
//!
//! The backend itself is a [`DocumentStore`], injected where it is needed
//! (there is no process-wide backend switch).
//!
//! ## Layout
//!
//! Tenant data lives under `clients/{tenantId}/{collection}`;
//! [`DocumentStore::collection`] resolves that path for the store's tenant.

use std::fmt;
use std::str::FromStr;

use eventdesk_core::{decode, encode, DecodeReport, Error, Fields, Record, Result, Value};
use tracing::warn;

/// Top-level collection that scopes every tenant's data.
pub const TENANT_SCOPE: &str = "clients";

/// Comparison operator of a `filter` clause.
///
/// The memory store evaluates only [`FilterOp::Eq`]; every other operator
/// matches nothing there. The remote store forwards all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `array-contains`
    ArrayContains,
    /// `in`
    In,
}

impl FilterOp {
    /// Operator as written in queries
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "==",
            FilterOp::NotEq => "!=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::ArrayContains => "array-contains",
            FilterOp::In => "in",
        }
    }
}

impl FromStr for FilterOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "==" => FilterOp::Eq,
            "!=" => FilterOp::NotEq,
            "<" => FilterOp::Lt,
            "<=" => FilterOp::Le,
            ">" => FilterOp::Gt,
            ">=" => FilterOp::Ge,
            "array-contains" => FilterOp::ArrayContains,
            "in" => FilterOp::In,
            other => {
                return Err(Error::InvalidInput(format!(
                    "unsupported filter operator '{other}'"
                )))
            }
        })
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root of a document store backend.
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Short backend name for logs ("memory", "firestore")
    fn kind(&self) -> &'static str;

    /// Tenant whose subtree [`DocumentStore::collection`] resolves into
    fn tenant_id(&self) -> &str;

    /// Top-level collection by name.
    fn root(&self, name: &str) -> Box<dyn CollectionRef>;

    /// `clients/{tenantId}/{name}`
    fn collection(&self, name: &str) -> Box<dyn CollectionRef> {
        self.root(TENANT_SCOPE)
            .doc(self.tenant_id())
            .collection(name)
    }
}

/// Locator for a collection or a query view over one.
pub trait CollectionRef: Send + Sync {
    /// Last path segment
    fn id(&self) -> &str;

    /// Full slash-separated path
    fn path(&self) -> &str;

    /// Document this collection is nested under, `None` at the top level
    fn parent(&self) -> Option<Box<dyn DocumentRef>>;

    /// Start reading every document in scope.
    fn documents(&self) -> Box<dyn DocumentIter>;

    /// View keeping documents whose `field` satisfies `op value`.
    fn filter(&self, field: &str, op: FilterOp, value: Value) -> Box<dyn CollectionRef>;

    /// View keeping at most `n` documents.
    fn limit(&self, n: usize) -> Box<dyn CollectionRef>;

    /// Store `fields` under a newly generated id.
    fn add(&self, fields: Fields) -> Result<Box<dyn DocumentRef>>;

    /// Reference to the document `id` (which need not exist).
    fn doc(&self, id: &str) -> Box<dyn DocumentRef>;
}

/// Locator for one document.
pub trait DocumentRef: Send + Sync {
    /// Document id
    fn id(&self) -> &str;

    /// Full slash-separated path
    fn path(&self) -> &str;

    /// Collection holding this document
    fn parent(&self) -> Box<dyn CollectionRef>;

    /// Read the document; `None` when it does not exist.
    fn get(&self) -> Result<Option<Box<dyn DocumentSnapshot>>>;

    /// Replace the whole document with `fields`.
    fn set(&self, fields: Fields) -> Result<()>;

    /// Remove the document. Removing a missing document succeeds.
    fn delete(&self) -> Result<()>;

    /// Subcollection `name` of this document.
    fn collection(&self, name: &str) -> Box<dyn CollectionRef>;
}

/// Fields read from one document at one point in time.
pub trait DocumentSnapshot: Send + Sync {
    /// Document id
    fn id(&self) -> &str;

    /// Live reference to the document this snapshot was read from
    fn reference(&self) -> Box<dyn DocumentRef>;

    /// Raw fields
    fn fields(&self) -> &Fields;
}

/// Pending read of a collection or view.
pub trait DocumentIter: Send {
    /// Materialize every document in scope.
    fn get_all(self: Box<Self>) -> Result<Vec<Box<dyn DocumentSnapshot>>>;
}

// ============================================================================
// Typed helpers
// ============================================================================

impl dyn CollectionRef + '_ {
    /// Encode `record` and store it under a generated id.
    pub fn add_record<R: Record>(&self, record: &R) -> Result<Box<dyn DocumentRef>> {
        self.add(encode(record))
    }

    /// Read every document in scope as `R`, ids attached.
    ///
    /// Documents with a field whose stored type does not fit `R` are left
    /// out of the result; use [`DocumentSnapshot`] reads to see them.
    pub fn get_records<R: Record>(&self) -> Result<Vec<R>> {
        let snapshots = self.documents().get_all()?;
        let mut records = Vec::with_capacity(snapshots.len());
        for snapshot in &snapshots {
            let mut record = R::default();
            let report = snapshot.data_to(&mut record);
            if !report.is_clean() {
                warn!(
                    collection = self.path(),
                    id = snapshot.id(),
                    "Skipping document that does not decode"
                );
                continue;
            }
            record.attach_id(snapshot.id());
            records.push(record);
        }
        Ok(records)
    }
}

impl dyn DocumentRef + '_ {
    /// Encode `record` and replace this document with it.
    pub fn set_record<R: Record>(&self, record: &R) -> Result<()> {
        self.set(encode(record))
    }
}

impl dyn DocumentSnapshot + '_ {
    /// Decode into `out`; mismatched fields are reported, not raised.
    pub fn data_to<R: Record>(&self, out: &mut R) -> DecodeReport {
        decode(self.fields(), out)
    }

    /// Decode into a fresh record and attach this snapshot's id.
    pub fn to_record<R: Record>(&self) -> R {
        let mut record = R::default();
        self.data_to(&mut record);
        record.attach_id(self.id());
        record
    }
}
