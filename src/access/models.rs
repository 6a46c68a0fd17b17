use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// What an access code authorizes at the locker door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessCodeType {
    Unlock,
    Lock,
    Emergency,
}

impl AccessCodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessCodeType::Unlock => "unlock",
            AccessCodeType::Lock => "lock",
            AccessCodeType::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for AccessCodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing an access code row.
///
/// Codes are single-use: `is_used` flips to true exactly once and
/// `used_at` records the first redemption.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessCode {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub code: String,
    pub code_type: AccessCodeType,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,
}

/// Query parameters for requesting an access code
#[derive(Debug, Deserialize)]
pub struct AccessCodeQuery {
    /// Defaults to unlock when omitted
    pub code_type: Option<AccessCodeType>,
}

/// Response DTO for an issued access code
#[derive(Debug, Serialize, ToSchema)]
pub struct AccessCodeResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub code: String,
    pub code_type: AccessCodeType,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
}

impl From<AccessCode> for AccessCodeResponse {
    fn from(code: AccessCode) -> Self {
        Self {
            id: code.id,
            booking_id: code.booking_id,
            code: code.code,
            code_type: code.code_type,
            expires_at: code.expires_at,
            is_used: code.is_used,
        }
    }
}
