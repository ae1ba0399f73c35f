//! Record codec: typed records to and from document [`Fields`]
//!
//! Every storable record declares a static field table ([`Record::FIELDS`])
//! plus explicit accessors; the codec walks that table.
//!
//! ## Key resolution
//!
//! Each [`FieldSpec`] may carry a store tag and a json tag. The storage key
//! is resolved in this order:
//!
//! 1. store tag
//! 2. json tag
//! 3. the declared field name
//!
//! A tag of exactly `-` excludes the field entirely. Anything after the first
//! `,` in a tag is a modifier (`photoUrl,omitempty`) and is not part of the key.
//!
//! ## Decode leniency
//!
//! `decode` never fails. A stored value whose type cannot be coerced into the
//! field's [`FieldKind`] leaves the field at its current value and is listed
//! in the returned [`DecodeReport`].

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::value::{Fields, Value};

/// Tag value that removes a field from the stored payload.
pub const SKIP_MARKER: &str = "-";

/// Separates a tag's key from its trailing modifiers.
pub const TAG_SEPARATOR: char = ',';

/// Storage type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `bool`
    Bool,
    /// `i64`
    Int,
    /// `f64`
    Float,
    /// `String`
    String,
    /// `Vec<String>`
    StringList,
    /// `DateTime<Utc>`
    Timestamp,
}

/// Declaration of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Declared field name, passed back to [`Record::read_field`] / [`Record::write_field`]
    pub name: &'static str,
    /// Primary tag (document store)
    pub store_tag: Option<&'static str>,
    /// Secondary tag (JSON)
    pub json_tag: Option<&'static str>,
    /// Storage type
    pub kind: FieldKind,
}

enum Tag {
    Unset,
    Skip,
    Key(&'static str),
}

fn parse_tag(tag: Option<&'static str>) -> Tag {
    match tag {
        None => Tag::Unset,
        Some(SKIP_MARKER) => Tag::Skip,
        Some(raw) => match raw.split(TAG_SEPARATOR).next() {
            Some(key) if !key.is_empty() => Tag::Key(key),
            _ => Tag::Unset,
        },
    }
}

impl FieldSpec {
    /// Declare a field with no tags.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            store_tag: None,
            json_tag: None,
            kind,
        }
    }

    /// Attach a store tag.
    pub const fn store(mut self, tag: &'static str) -> Self {
        self.store_tag = Some(tag);
        self
    }

    /// Attach a json tag.
    pub const fn json(mut self, tag: &'static str) -> Self {
        self.json_tag = Some(tag);
        self
    }

    /// Storage key for this field, or `None` when the field is skipped.
    pub fn key(&self) -> Option<&'static str> {
        match parse_tag(self.store_tag) {
            Tag::Key(key) => return Some(key),
            Tag::Skip => return None,
            Tag::Unset => {}
        }
        match parse_tag(self.json_tag) {
            Tag::Key(key) => Some(key),
            Tag::Skip => None,
            Tag::Unset => Some(self.name),
        }
    }
}

/// A typed record that can be stored as a document.
pub trait Record: Default {
    /// Field table, in declaration order.
    const FIELDS: &'static [FieldSpec];

    /// Current value of the named field, `None` for unknown names.
    fn read_field(&self, name: &str) -> Option<Value>;

    /// Assign the named field. `value` has already been coerced to the
    /// field's [`FieldKind`]; unknown names and variants are ignored.
    fn write_field(&mut self, name: &str, value: Value);

    /// Re-attach the document id after a read. Records without an id field
    /// keep the default, which ignores it.
    fn attach_id(&mut self, _id: &str) {}
}

/// A stored value that could not be assigned during decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    /// Storage key
    pub key: &'static str,
    /// Kind the record declares
    pub expected: FieldKind,
    /// Variant found in the document
    pub found: &'static str,
}

/// Outcome of [`decode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Number of fields assigned
    pub assigned: usize,
    /// Fields present in the document but left untouched
    pub skipped: Vec<FieldMismatch>,
}

impl DecodeReport {
    /// True when nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Convert a record to document fields.
///
/// Skipped fields never appear in the output.
pub fn encode<R: Record>(record: &R) -> Fields {
    let mut fields = Fields::with_capacity(R::FIELDS.len());
    for spec in R::FIELDS {
        let Some(key) = spec.key() else { continue };
        if let Some(value) = record.read_field(spec.name) {
            fields.insert(key.to_string(), value);
        }
    }
    fields
}

/// Copy document fields into `out`.
///
/// Only keys known to both sides are touched; unknown document keys are
/// ignored and missing keys keep the record's current value.
pub fn decode<R: Record>(fields: &Fields, out: &mut R) -> DecodeReport {
    let mut report = DecodeReport::default();

    for spec in R::FIELDS {
        let Some(key) = spec.key() else { continue };
        let Some(stored) = fields.get(key) else { continue };

        match coerce(stored, spec.kind) {
            Some(value) => {
                out.write_field(spec.name, value);
                report.assigned += 1;
            }
            None => report.skipped.push(FieldMismatch {
                key,
                expected: spec.kind,
                found: stored.type_name(),
            }),
        }
    }

    if !report.is_clean() {
        warn!(skipped = ?report.skipped, "decode left mismatched fields unset");
    }
    report
}

/// Convenience: decode into a fresh default record.
pub fn decode_new<R: Record>(fields: &Fields) -> (R, DecodeReport) {
    let mut record = R::default();
    let report = decode(fields, &mut record);
    (record, report)
}

/// Coerce a stored value into `kind`.
///
/// Exact matches pass through; `Int` and `Float` convert into each other
/// (floats truncate toward zero); timestamps also accept RFC 3339 strings;
/// string lists accept arrays made only of strings.
pub fn coerce(value: &Value, kind: FieldKind) -> Option<Value> {
    match (kind, value) {
        (FieldKind::Bool, Value::Bool(_))
        | (FieldKind::Int, Value::Int(_))
        | (FieldKind::Float, Value::Float(_))
        | (FieldKind::String, Value::String(_))
        | (FieldKind::Timestamp, Value::Timestamp(_)) => Some(value.clone()),

        (FieldKind::Int, Value::Float(f)) if f.is_finite() => Some(Value::Int(f.trunc() as i64)),
        (FieldKind::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),

        (FieldKind::Timestamp, Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| Value::Timestamp(t.with_timezone(&Utc))),

        (FieldKind::StringList, Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Value::from),

        _ => None,
    }
}
