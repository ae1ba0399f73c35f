use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{FieldKind, FieldSpec, Record};
use crate::value::Value;

/// A registered attendee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// Document id
    pub id: String,
    /// Display name
    pub full_name: String,
    /// Contact email, checked against existing registrations on register
    pub email: String,
    /// Job title or role
    pub designation: String,
    /// Time the registration was accepted
    pub registered_at: DateTime<Utc>,
}

impl Attendee {
    /// Storage key of the email field, used for duplicate checks
    pub const EMAIL_KEY: &'static str = "email";
}

impl Record for Attendee {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("id", FieldKind::String).store("-").json("id"),
        FieldSpec::new("full_name", FieldKind::String)
            .store("fullName")
            .json("fullName"),
        FieldSpec::new("email", FieldKind::String)
            .store("email")
            .json("email"),
        FieldSpec::new("designation", FieldKind::String)
            .store("designation")
            .json("designation"),
        FieldSpec::new("registered_at", FieldKind::Timestamp)
            .store("registeredAt")
            .json("registeredAt"),
    ];

    fn read_field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.clone().into(),
            "full_name" => self.full_name.clone().into(),
            "email" => self.email.clone().into(),
            "designation" => self.designation.clone().into(),
            "registered_at" => self.registered_at.into(),
            _ => return None,
        })
    }

    fn write_field(&mut self, name: &str, value: Value) {
        match (name, value) {
            ("id", Value::String(v)) => self.id = v,
            ("full_name", Value::String(v)) => self.full_name = v,
            ("email", Value::String(v)) => self.email = v,
            ("designation", Value::String(v)) => self.designation = v,
            ("registered_at", Value::Timestamp(v)) => self.registered_at = v,
            _ => {}
        }
    }

    fn attach_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_new, encode};
    use chrono::TimeZone;

    #[test]
    fn test_attendee_payload_excludes_id() {
        let attendee = Attendee {
            id: "doc_1_1".into(),
            full_name: "John Doe".into(),
            email: "john@example.com".into(),
            designation: "Developer".into(),
            registered_at: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
        };

        let fields = encode(&attendee);
        assert!(!fields.contains_key("id"));
        assert_eq!(fields.get("fullName"), Some(&Value::from("John Doe")));
        assert_eq!(
            fields.get(Attendee::EMAIL_KEY),
            Some(&Value::from("john@example.com"))
        );

        let (decoded, report): (Attendee, _) = decode_new(&fields);
        assert!(report.is_clean());
        assert_eq!(decoded.id, "");
        assert_eq!(decoded.registered_at, attendee.registered_at);
    }

    #[test]
    fn test_attendee_json_is_camel_case() {
        let json = serde_json::to_value(Attendee::default()).unwrap();
        assert!(json.get("fullName").is_some());
        assert!(json.get("registeredAt").is_some());
    }
}
