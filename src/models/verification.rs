//! Email OTP verification model.
//!
//! One row per issued code. Codes are stored as SHA-256 hashes with an
//! expiry and an attempt counter; a verified row is consumed and never
//! reused.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Represents an email verification record from the database.
///
/// # Database Table
///
/// Maps to the `email_verifications` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmailVerification {
    /// Unique identifier for this verification
    pub id: Uuid,

    /// Email address being verified (stored lowercased)
    pub email: String,

    /// SHA-256 hash of the 6-digit code
    pub code_hash: String,

    /// Wrong guesses so far; the code burns after 5
    pub attempts: i32,

    /// Whether the code was successfully used
    pub verified: bool,

    /// Codes expire 10 minutes after issuance
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,
}

/// Request body for requesting a verification code.
#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub email: String,
}

/// Request body for verifying a code.
#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub code: String,
}
