//! Domain records stored by eventdesk
//!
//! Each record implements [`Record`](crate::codec::Record) with an explicit
//! field table. The document id is never part of the stored payload: every
//! `id` field carries the skip marker as its store tag and is re-attached by
//! the caller after a read.

mod attendee;
mod session;
mod speaker;

pub use attendee::Attendee;
pub use session::Session;
pub use speaker::Speaker;

/// Collection holding [`Attendee`] documents
pub const ATTENDEES: &str = "attendees";
/// Collection holding [`Session`] documents
pub const SESSIONS: &str = "sessions";
/// Collection holding [`Speaker`] documents
pub const SPEAKERS: &str = "speakers";

/// The fixed collections every tenant owns.
pub const COLLECTIONS: [&str; 3] = [ATTENDEES, SESSIONS, SPEAKERS];
