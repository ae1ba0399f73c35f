use serde::{Deserialize, Serialize};

use crate::codec::{FieldKind, FieldSpec, Record};
use crate::value::Value;

/// A scheduled talk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Document id
    pub id: String,
    /// Talk title
    pub title: String,
    /// Abstract
    pub description: String,
    /// Free-form slot label, e.g. "10:00 AM"
    pub time: String,
    /// Id of the presenting [`Speaker`](super::Speaker)
    pub speaker_id: String,
}

impl Record for Session {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("id", FieldKind::String).store("-").json("id"),
        FieldSpec::new("title", FieldKind::String)
            .store("title")
            .json("title"),
        FieldSpec::new("description", FieldKind::String)
            .store("description")
            .json("description"),
        FieldSpec::new("time", FieldKind::String).store("time").json("time"),
        FieldSpec::new("speaker_id", FieldKind::String)
            .store("speakerId")
            .json("speakerId"),
    ];

    fn read_field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.clone().into(),
            "title" => self.title.clone().into(),
            "description" => self.description.clone().into(),
            "time" => self.time.clone().into(),
            "speaker_id" => self.speaker_id.clone().into(),
            _ => return None,
        })
    }

    fn write_field(&mut self, name: &str, value: Value) {
        match (name, value) {
            ("id", Value::String(v)) => self.id = v,
            ("title", Value::String(v)) => self.title = v,
            ("description", Value::String(v)) => self.description = v,
            ("time", Value::String(v)) => self.time = v,
            ("speaker_id", Value::String(v)) => self.speaker_id = v,
            _ => {}
        }
    }

    fn attach_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}
