//! Request and response bodies
//!
//! Request fields default to empty so a missing field reaches validation and
//! is reported by name.

use eventdesk_core::{Session, Speaker};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// `POST /api/attendees/register`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub designation: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&[
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("designation", &self.designation),
        ])
    }
}

/// `POST /api/admin/sessions`; an `id` updates that session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time: String,
    pub speaker_id: String,
}

impl SessionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&[
            ("title", &self.title),
            ("description", &self.description),
            ("time", &self.time),
            ("speakerId", &self.speaker_id),
        ])
    }

    pub fn into_session(self) -> Session {
        Session {
            id: self.id,
            title: self.title,
            description: self.description,
            time: self.time,
            speaker_id: self.speaker_id,
        }
    }
}

/// `POST /api/admin/speakers`; an `id` updates that speaker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeakerRequest {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub photo_url: String,
}

impl SpeakerRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&[("name", &self.name)])
    }

    pub fn into_speaker(self) -> Speaker {
        Speaker {
            id: self.id,
            name: self.name,
            bio: self.bio,
            photo_url: self.photo_url,
        }
    }
}

/// `POST /api/admin/login`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const DELETED: StatusResponse = StatusResponse { status: "deleted" };
}

/// A session with its speaker embedded when the speaker exists.
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithSpeaker {
    #[serde(flatten)]
    pub session: Session,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Speaker>,
}

fn require(fields: &[(&str, &String)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_named() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"fullName":"Ada","email":"  "}"#).unwrap();
        let err = request.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: email, designation"
        );
    }

    #[test]
    fn test_session_request_optional_id() {
        let request: SessionRequest = serde_json::from_str(
            r#"{"title":"T","description":"D","time":"10:00 AM","speakerId":"s1"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        let session = request.into_session();
        assert!(session.id.is_empty());
        assert_eq!(session.speaker_id, "s1");
    }

    #[test]
    fn test_session_with_speaker_flattens() {
        let body = SessionWithSpeaker {
            session: Session {
                id: "s".into(),
                title: "T".into(),
                speaker_id: "k".into(),
                ..Session::default()
            },
            speaker: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["id"], "s");
        assert_eq!(json["speakerId"], "k");
        assert!(json.get("speaker").is_none());
    }
}
