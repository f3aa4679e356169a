//! API key models for credential storage and key management endpoints.
//!
//! API keys authenticate integrators calling the public order API. They are
//! stored as SHA-256 hashes; the plaintext key exists only in the creation
//! response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table.
///
/// # Lookup Strategy
///
/// `key_prefix` holds the non-secret lead of the key
/// (`rk_{mode}_{first 8 secret chars}`) so validation fetches a handful of
/// candidates by prefix instead of hashing against the whole table.
/// `secret_hash` is SHA-256 over the full presented key (64 hex characters).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    /// Unique identifier for this API key
    pub id: Uuid,

    /// Restaurant this key is scoped to
    pub restaurant_id: Uuid,

    /// Human-readable label chosen by the owner
    pub name: String,

    /// Public lookup prefix, e.g. `rk_live_AbCdEfGh`
    pub key_prefix: String,

    /// SHA-256 hash of the full key string
    pub secret_hash: String,

    /// Permission strings gating routes, e.g. `orders:create`, `menu:read`
    pub permissions: Vec<String>,

    /// Origin allow-list; empty means unrestricted.
    ///
    /// Entries are exact origins (`https://shop.example.com`) or
    /// wildcard-subdomain patterns (`*.example.com`).
    pub allowed_origins: Vec<String>,

    /// Requests allowed per 60-second window
    pub rate_limit_per_minute: i32,

    /// Optional expiry; NULL keys never expire
    pub expires_at: Option<DateTime<Utc>>,

    /// Whether this key is currently valid.
    ///
    /// Revoked keys are deactivated, never deleted, so usage history
    /// survives for auditing.
    pub is_active: bool,

    /// Validated requests served by this key
    pub usage_count: i64,

    /// Timestamp of the most recent validated use
    pub last_used_at: Option<DateTime<Utc>>,

    /// Timestamp when this key was created
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a new API key.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Website ordering",
///   "permissions": ["orders:create", "orders:read", "menu:read"],
///   "allowed_origins": ["https://order.example.com", "*.example.com"],
///   "rate_limit_per_minute": 120,
///   "expires_in_days": 365
/// }
/// ```
///
/// # Validation
///
/// - `name`: required, non-empty
/// - `permissions`: required, at least one entry
/// - `allowed_origins`: optional, each entry an http(s) origin or `*.domain`
/// - `rate_limit_per_minute`: optional, defaults to 60
/// - `expires_in_days`: optional, keys without it never expire
/// - `test_mode`: optional, issues an `rk_test_` key instead of `rk_live_`
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    /// Label for the new key
    pub name: String,

    /// Permissions granted to the key
    pub permissions: Vec<String>,

    /// Origin allow-list (empty = unrestricted)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Per-minute request budget
    pub rate_limit_per_minute: Option<i32>,

    /// Days until expiry
    pub expires_in_days: Option<i64>,

    /// Issue a test-mode key
    #[serde(default)]
    pub test_mode: bool,
}

/// Response body for key endpoints.
///
/// # Security Note
///
/// The `key` field is ONLY included when creating a new key. It is never
/// returned in list operations; only the public prefix identifies the key
/// afterwards.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub name: String,
    pub key_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub permissions: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            key_prefix: key.key_prefix,
            key: None, // Never include the plaintext by default
            permissions: key.permissions,
            allowed_origins: key.allowed_origins,
            rate_limit_per_minute: key.rate_limit_per_minute,
            expires_at: key.expires_at,
            is_active: key.is_active,
            usage_count: key.usage_count,
            last_used_at: key.last_used_at,
            created_at: key.created_at,
        }
    }
}

impl ApiKeyResponse {
    /// Attach the plaintext key (only for the creation response).
    pub fn with_key(mut self, key: String) -> Self {
        self.key = Some(key);
        self
    }
}
