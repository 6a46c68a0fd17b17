use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::access::AccessCodeType;

/// Generator for locker door codes.
///
/// Format: `LOCKSPOT-{booking_id}-{TYPE}-{YYYYmmddHHMMSS}-{8 hex chars}`.
/// The random suffix keeps codes unguessable even when the booking ID is
/// known; the timestamp makes regenerated codes distinguishable.
pub struct CodeGenerator;

impl CodeGenerator {
    /// Generate a fresh code for a booking
    pub fn generate(booking_id: Uuid, code_type: AccessCodeType, now: DateTime<Utc>) -> String {
        let nonce: u32 = rand::thread_rng().gen();
        format!(
            "LOCKSPOT-{}-{}-{}-{:08X}",
            booking_id,
            code_type.as_str().to_uppercase(),
            now.format("%Y%m%d%H%M%S"),
            nonce
        )
    }

    /// Check that a string has the shape of a generated code
    pub fn is_well_formed(code: &str) -> bool {
        // The UUID segment itself contains four dashes, so a full code
        // splits into nine parts.
        let parts: Vec<&str> = code.split('-').collect();
        if parts.len() != 9 || parts[0] != "LOCKSPOT" {
            return false;
        }
        if Uuid::parse_str(&parts[1..6].join("-")).is_err() {
            return false;
        }
        if !matches!(parts[6], "UNLOCK" | "LOCK" | "EMERGENCY") {
            return false;
        }
        let timestamp = parts[7];
        if timestamp.len() != 14 || !timestamp.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        let suffix = parts[8];
        suffix.len() == 8 && suffix.chars().all(|c| c.is_ascii_hexdigit())
    }
}
