use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::access::error::AccessCodeError;
use crate::access::models::{AccessCode, AccessCodeType};

const ACCESS_CODE_COLUMNS: &str =
    "id, booking_id, code, code_type, expires_at, is_used, used_at, generated_at";

/// Repository for access code rows
#[derive(Clone)]
pub struct AccessCodesRepository {
    pool: PgPool,
}

impl AccessCodesRepository {
    /// Create a new AccessCodesRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an access code by ID
    pub async fn find_by_id(&self, code_id: Uuid) -> Result<Option<AccessCode>, AccessCodeError> {
        let code = sqlx::query_as::<_, AccessCode>(&format!(
            "SELECT {ACCESS_CODE_COLUMNS} FROM access_codes WHERE id = $1"
        ))
        .bind(code_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(code)
    }

    /// Newest unused, unexpired code of the given type for a booking,
    /// inside the caller's transaction
    pub async fn find_reusable(
        conn: &mut PgConnection,
        booking_id: Uuid,
        code_type: AccessCodeType,
    ) -> Result<Option<AccessCode>, sqlx::Error> {
        sqlx::query_as::<_, AccessCode>(&format!(
            r#"
            SELECT {ACCESS_CODE_COLUMNS}
            FROM access_codes
            WHERE booking_id = $1
              AND code_type = $2
              AND is_used = FALSE
              AND expires_at > NOW()
            ORDER BY generated_at DESC
            LIMIT 1
            "#
        ))
        .bind(booking_id)
        .bind(code_type)
        .fetch_optional(conn)
        .await
    }

    /// Insert a freshly generated code inside the caller's transaction
    pub async fn insert(
        conn: &mut PgConnection,
        booking_id: Uuid,
        code: &str,
        code_type: AccessCodeType,
        expires_at: DateTime<Utc>,
    ) -> Result<AccessCode, sqlx::Error> {
        sqlx::query_as::<_, AccessCode>(&format!(
            r#"
            INSERT INTO access_codes (booking_id, code, code_type, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACCESS_CODE_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(code)
        .bind(code_type)
        .bind(expires_at)
        .fetch_one(conn)
        .await
    }

    /// Mark a code used. The flip is one-way: a code already used keeps its
    /// original used_at, so redeeming twice is a harmless no-op.
    pub async fn mark_used(&self, code_id: Uuid) -> Result<Option<AccessCode>, AccessCodeError> {
        let code = sqlx::query_as::<_, AccessCode>(&format!(
            r#"
            UPDATE access_codes
            SET is_used = TRUE, used_at = COALESCE(used_at, NOW())
            WHERE id = $1
            RETURNING {ACCESS_CODE_COLUMNS}
            "#
        ))
        .bind(code_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(code)
    }
}
