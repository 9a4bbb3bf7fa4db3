//! Shared wire DTOs for the school-administration REST backend.
//!
//! DESIGN
//! ======
//! Field names on the wire are the backend's Spanish names (`nombre`, `rol`,
//! `curso_id`, ...); Rust-side names are English and mapped with
//! `#[serde(rename)]` so views never see wire spelling. Ids are accepted as
//! JSON numbers or numeric strings because the backend is not consistent
//! about which it emits.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier for every resource.
pub type Id = i64;

/// Closed set of roles an authenticated identity can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "docente")]
    Teacher,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Teacher];

    /// Wire value for this role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "docente",
        }
    }

    /// Human-readable label shown in the sidebar and user table.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrador",
            Self::Teacher => "Docente",
        }
    }

    /// Parse a wire value; unknown roles yield `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "docente" => Some(Self::Teacher),
            _ => None,
        }
    }
}

/// The authenticated user as returned by the login exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Id,
    #[serde(rename = "nombre")]
    pub display_name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// Login form payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful login response: `{ token, user }`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub user: Identity,
}

/// A user account row in the admin user table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// Create/update payload for a user account. An absent password on update
/// leaves the stored password unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// Payload for `PATCH usuarios/{id}/password`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordChange {
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(
        rename = "curso_id",
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub course_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A teacher ↔ subject ↔ course assignment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Id,
    #[serde(rename = "docente_id", deserialize_with = "deserialize_id")]
    pub teacher_id: Id,
    #[serde(rename = "materia_id", deserialize_with = "deserialize_id")]
    pub subject_id: Id,
    #[serde(rename = "curso_id", deserialize_with = "deserialize_id")]
    pub course_id: Id,
}

/// One student's presence for a subject on a date (`YYYY-MM-DD`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "deserialize_opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(rename = "estudiante_id", deserialize_with = "deserialize_id")]
    pub student_id: Id,
    #[serde(rename = "materia_id", deserialize_with = "deserialize_id")]
    pub subject_id: Id,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "presente")]
    pub present: bool,
}

/// One student's grade for a subject in a trimester.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    #[serde(default, deserialize_with = "deserialize_opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(rename = "estudiante_id", deserialize_with = "deserialize_id")]
    pub student_id: Id,
    #[serde(rename = "materia_id", deserialize_with = "deserialize_id")]
    pub subject_id: Id,
    #[serde(rename = "trimestre")]
    pub trimester: u8,
    #[serde(rename = "nota")]
    pub grade: f64,
}

/// Output format accepted by the report endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Pdf,
    Excel,
}

impl ReportFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }

    /// File extension used when the report is downloaded as a document.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "pdf" => Some(Self::Pdf),
            "excel" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Query parameters shared by every report endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub format: ReportFormat,
    pub trimester: Option<u8>,
    pub subject_id: Option<Id>,
    pub teacher_id: Option<Id>,
}

/// Report endpoint result: a binary document or structured rows.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportPayload {
    Document { bytes: Vec<u8>, content_type: Option<String> },
    Data(serde_json::Value),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Id, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| D::Error::custom(format!("expected integer id, got {value}")))
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    id_from_value(&value)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected integer id, got {value}")))
}

fn id_from_value(value: &serde_json::Value) -> Option<Id> {
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Some(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                return Some(float as i64);
            }
            None
        }
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
