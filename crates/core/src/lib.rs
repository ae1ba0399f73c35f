//! Core types for eventdesk
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / Fields: the document data model
//! - Error: error type hierarchy shared by every storage backend
//! - Codec: explicit record ⇄ fields mapping (`Record`, `FieldSpec`, `encode`, `decode`)
//! - Models: `Attendee`, `Session`, `Speaker` and the collection names that hold them

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod models;
pub mod value;

pub use codec::{
    coerce, decode, decode_new, encode, DecodeReport, FieldKind, FieldMismatch, FieldSpec, Record,
    SKIP_MARKER, TAG_SEPARATOR,
};
pub use error::{Error, Result};
pub use models::{Attendee, Session, Speaker, ATTENDEES, COLLECTIONS, SESSIONS, SPEAKERS};
pub use value::{Fields, Value};
