//! Staff session tokens.
//!
//! After a successful PIN login, staff receive a compact bearer token:
//!
//! ```text
//! {staff_id}.{expires_unix}.{hmac_hex}
//! ```
//!
//! The signature is HMAC-SHA256 over `{staff_id}.{expires_unix}` using the
//! server's session secret, so tokens are verifiable without a session
//! table. `Mac::verify_slice` performs the comparison in constant time.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Claims recovered from a verified session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    pub staff_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HMAC-signed staff session tokens.
#[derive(Debug)]
pub struct SessionSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl SessionSigner {
    /// Build a signer from the configured secret and TTL in minutes.
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issue a token for a staff member, valid for the configured TTL.
    pub fn issue(&self, staff_id: Uuid) -> (String, DateTime<Utc>) {
        let expires_at = Utc::now() + self.ttl;
        let payload = format!("{}.{}", staff_id, expires_at.timestamp());
        let signature = self.sign(&payload);

        (format!("{payload}.{signature}"), expires_at)
    }

    /// Verify a presented token and recover its claims.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidSession` when the token is malformed, the
    /// signature does not verify, or the expiry has passed. All three cases
    /// share one error so the response doesn't reveal which check failed.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let mut parts = token.splitn(3, '.');
        let (Some(id_part), Some(exp_part), Some(sig_part)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::InvalidSession);
        };

        let staff_id = Uuid::parse_str(id_part).map_err(|_| AppError::InvalidSession)?;
        let expires_ts: i64 = exp_part.parse().map_err(|_| AppError::InvalidSession)?;

        // Signature first: expiry of a forged token is meaningless
        let payload = format!("{id_part}.{exp_part}");
        let signature = hex::decode(sig_part).map_err(|_| AppError::InvalidSession)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AppError::InvalidSession)?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AppError::InvalidSession)?;

        let expires_at = DateTime::from_timestamp(expires_ts, 0)
            .ok_or(AppError::InvalidSession)?;
        if expires_at <= Utc::now() {
            return Err(AppError::InvalidSession);
        }

        Ok(SessionClaims {
            staff_id,
            expires_at,
        })
    }

    /// HMAC-SHA256 signature over the payload, hex encoded.
    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new("test-secret", 60)
    }

    #[test]
    fn issued_token_verifies() {
        let signer = signer();
        let staff_id = Uuid::new_v4();

        let (token, expires_at) = signer.issue(staff_id);
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.staff_id, staff_id);
        assert_eq!(claims.expires_at.timestamp(), expires_at.timestamp());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let signer = signer();
        let (token, _) = signer.issue(Uuid::new_v4());

        let mut tampered = token.clone();
        // Flip the last hex character of the signature
        let last = if tampered.ends_with('0') { '1' } else { '0' };
        tampered.pop();
        tampered.push(last);

        assert!(matches!(
            signer.verify(&tampered),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn tampered_expiry_is_rejected() {
        let signer = signer();
        let (token, _) = signer.issue(Uuid::new_v4());

        // Extend the expiry without re-signing
        let mut parts: Vec<&str> = token.split('.').collect();
        let extended = format!("{}", i64::MAX / 2);
        parts[1] = &extended;
        let forged = parts.join(".");

        assert!(matches!(
            signer.verify(&forged),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        // TTL of zero minutes expires immediately
        let signer = SessionSigner::new("test-secret", 0);
        let (token, _) = signer.issue(Uuid::new_v4());

        assert!(matches!(
            signer.verify(&token),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let (token, _) = SessionSigner::new("secret-a", 60).issue(Uuid::new_v4());

        assert!(matches!(
            SessionSigner::new("secret-b", 60).verify(&token),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let signer = signer();

        for junk in ["", "a.b", "not-a-uuid.123.abcd", "..."] {
            assert!(matches!(
                signer.verify(junk),
                Err(AppError::InvalidSession)
            ));
        }
    }
}
