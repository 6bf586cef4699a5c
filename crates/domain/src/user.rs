use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Role;

/// Base account record returned by the login endpoint.
///
/// Replaced wholesale on every login; read-only everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend-assigned user identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Account role driving dashboard selection and enrollment fetches.
    pub role: Role,
    /// Given name.
    pub first_name: String,
    /// Middle name, when the account has one.
    #[serde(default)]
    pub middle_name: Option<String>,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the backend marks the account as staff.
    pub is_staff: bool,
    /// When the account was created, when the backend sends it.
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    /// Most recent prior login, when the backend sends it.
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Joins the name parts, skipping absent or empty segments.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = vec![self.first_name.as_str()];
        if let Some(middle) = self.middle_name.as_deref() {
            parts.push(middle);
        }
        parts.push(self.last_name.as_str());

        parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<&str>>()
            .join(" ")
    }
}
