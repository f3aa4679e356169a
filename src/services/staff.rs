//! Staff PIN authentication.
//!
//! Staff log in with a short numeric PIN scoped to their restaurant. PINs
//! are stored as SHA-256 digests; login fetches the restaurant's active
//! staff and compares digests in constant time. Attempt throttling happens
//! in the handler before this service is called.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{db::DbPool, error::AppError, models::staff::StaffMember};

/// Authenticate a staff member by restaurant and PIN.
///
/// # Errors
///
/// - `InvalidRequest`: PIN is not 4-6 digits
/// - `InvalidCredentials`: no active staff member with that PIN (unknown
///   restaurant and wrong PIN are indistinguishable on purpose
pub async fn login(
    pool: &DbPool,
    restaurant_id: Uuid,
    pin: &str,
) -> Result<StaffMember, AppError> {
    if pin.len() < 4 || pin.len() > 6 || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidRequest(
            "PIN must be 4 to 6 digits".to_string(),
        ));
    }

    let staff = sqlx::query_as::<_, StaffMember>(
        "SELECT * FROM staff_members WHERE restaurant_id = $1 AND is_active = true",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    let presented_hash = hash_pin(pin);

    // Compare against every active member rather than querying by hash:
    // the scan is tiny and keeps the comparison constant-time
    let matched = staff
        .into_iter()
        .find(|member| digests_match(&presented_hash, &member.pin_hash));

    matched.ok_or(AppError::InvalidCredentials)
}

/// SHA-256 digest of a PIN, hex encoded.
pub fn hash_pin(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison of two hex digests.
fn digests_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_hash_is_stable_hex_sha256() {
        let h = hash_pin("1234");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_pin("1234"));
        assert_ne!(h, hash_pin("1235"));
    }

    #[test]
    fn digest_comparison_matches_equality() {
        assert!(digests_match(&hash_pin("0000"), &hash_pin("0000")));
        assert!(!digests_match(&hash_pin("0000"), &hash_pin("9999")));
        assert!(!digests_match("short", &hash_pin("0000")));
    }
}
