//! Document store layer for eventdesk
//!
//! This crate implements the reference façade and its two backends:
//! - facade: `DocumentStore`, `CollectionRef`, `DocumentRef`, `DocumentSnapshot`, `DocumentIter`
//! - MemoryStore: tenant collections in process memory behind one RwLock
//! - RemoteStore: hosted Firestore database over its REST API
//!
//! Handlers receive an `Arc<dyn DocumentStore>` and never name a backend.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod facade;
pub mod memory;
pub mod remote;

pub use eventdesk_core::{Error, Result};
pub use facade::{
    CollectionRef, DocumentIter, DocumentRef, DocumentSnapshot, DocumentStore, FilterOp,
    TENANT_SCOPE,
};
pub use memory::MemoryStore;
pub use remote::{RemoteConfig, RemoteStore, ServiceAccount, TokenSource};
