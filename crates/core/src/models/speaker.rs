use serde::{Deserialize, Serialize};

use crate::codec::{FieldKind, FieldSpec, Record};
use crate::value::Value;

/// A person presenting one or more sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    /// Document id
    pub id: String,
    /// Display name
    pub name: String,
    /// Short biography
    pub bio: String,
    /// Portrait URL, empty when none was provided
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub photo_url: String,
}

impl Record for Speaker {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("id", FieldKind::String).store("-").json("id"),
        FieldSpec::new("name", FieldKind::String).store("name").json("name"),
        FieldSpec::new("bio", FieldKind::String).store("bio").json("bio"),
        FieldSpec::new("photo_url", FieldKind::String)
            .store("photoUrl,omitempty")
            .json("photoUrl,omitempty"),
    ];

    fn read_field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.clone().into(),
            "name" => self.name.clone().into(),
            "bio" => self.bio.clone().into(),
            "photo_url" => self.photo_url.clone().into(),
            _ => return None,
        })
    }

    fn write_field(&mut self, name: &str, value: Value) {
        match (name, value) {
            ("id", Value::String(v)) => self.id = v,
            ("name", Value::String(v)) => self.name = v,
            ("bio", Value::String(v)) => self.bio = v,
            ("photo_url", Value::String(v)) => self.photo_url = v,
            _ => {}
        }
    }

    fn attach_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}
