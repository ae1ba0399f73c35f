//! eventdesk - event registration backend over a pluggable document store
//!
//! The workspace is split into three crates, re-exported here:
//!
//! - [`core`]: values, the record codec and the `Attendee` / `Session` / `Speaker` models
//! - [`store`]: the reference façade with in-memory and Firestore backends
//! - [`server`]: the axum HTTP API
//!
//! # Quick Start
//!
//! ```ignore
//! use eventdesk::core::{Attendee, ATTENDEES};
//! use eventdesk::store::{DocumentStore, MemoryStore};
//!
//! let store = MemoryStore::new("acme");
//! let attendees = store.collection(ATTENDEES);
//! let doc = attendees.add_record(&Attendee::default())?;
//! let all: Vec<Attendee> = attendees.get_records()?;
//! ```

pub use eventdesk_core as core;
pub use eventdesk_server as server;
pub use eventdesk_store as store;
