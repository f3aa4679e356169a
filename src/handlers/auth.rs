//! Authentication HTTP handlers.
//!
//! This module implements the credential endpoints:
//! - POST /api/v1/auth/staff/login - Staff PIN login
//! - POST /api/v1/auth/otp/request - Request an email verification code
//! - POST /api/v1/auth/otp/verify - Verify a code
//!
//! All three are public routes, throttled with fixed-window rate limits
//! before any credential check runs.

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::staff::{StaffLoginRequest, StaffLoginResponse},
    models::verification::{OtpRequest, OtpVerifyRequest},
    services::{otp, staff},
    state::AppState,
};

/// PIN attempts allowed per restaurant + client IP per minute.
const LOGIN_MAX_PER_MINUTE: u32 = 5;

/// OTP issuance allowed per email per 10 minutes.
const OTP_REQUEST_MAX: u32 = 3;

/// OTP verification attempts allowed per email per 10 minutes.
const OTP_VERIFY_MAX: u32 = 10;

const MINUTE: Duration = Duration::from_secs(60);
const TEN_MINUTES: Duration = Duration::from_secs(600);

/// Staff PIN login.
///
/// # Endpoint
///
/// `POST /api/v1/auth/staff/login`
///
/// # Request Body
///
/// ```json
/// {
///   "restaurant_id": "550e8400-e29b-41d4-a716-446655440000",
///   "pin": "4821"
/// }
/// ```
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "token": "c0a8...f1.1724527200.9b3c...",
///   "staff_id": "660e8400-e29b-41d4-a716-446655440001",
///   "name": "Amira",
///   "role": "owner",
///   "expires_at": "2026-08-24T20:00:00Z"
/// }
/// ```
///
/// # Rate Limiting
///
/// 5 attempts per restaurant + client IP per minute; further attempts get
/// 429 with a Retry-After header. The limit is checked before the PIN so
/// a locked-out caller learns nothing about PIN validity.
pub async fn staff_login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<StaffLoginRequest>,
) -> Result<Json<StaffLoginResponse>, AppError> {
    let identifier = format!("login:{}:{}", request.restaurant_id, addr.ip());
    if let Err(retry) = state.limiter.check(&identifier, LOGIN_MAX_PER_MINUTE, MINUTE) {
        return Err(AppError::RateLimited {
            retry_after_secs: retry.as_secs_ceil(),
        });
    }

    let member = staff::login(&state.pool, request.restaurant_id, &request.pin).await?;

    let (token, expires_at) = state.sessions.issue(member.id);

    tracing::info!(staff_id = %member.id, restaurant_id = %member.restaurant_id, "Staff login");

    Ok(Json(StaffLoginResponse {
        token,
        staff_id: member.id,
        name: member.name,
        role: member.role,
        expires_at,
    }))
}

/// Request an email verification code.
///
/// # Endpoint
///
/// `POST /api/v1/auth/otp/request`
///
/// # Request Body
///
/// ```json
/// { "email": "guest@example.com" }
/// ```
///
/// # Response (202 Accepted)
///
/// ```json
/// { "status": "sent" }
/// ```
///
/// The response is 202 whether or not delivery ultimately succeeds:
/// dispatch goes through an external mail gateway.
///
/// # Rate Limiting
///
/// 3 codes per email per 10 minutes.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(request): Json<OtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let identifier = format!("otp-request:{}", request.email.trim().to_lowercase());
    if let Err(retry) = state.limiter.check(&identifier, OTP_REQUEST_MAX, TEN_MINUTES) {
        return Err(AppError::RateLimited {
            retry_after_secs: retry.as_secs_ceil(),
        });
    }

    otp::issue_code(&state.pool, &request.email).await?;

    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "sent" }))))
}

/// Verify an email verification code.
///
/// # Endpoint
///
/// `POST /api/v1/auth/otp/verify`
///
/// # Request Body
///
/// ```json
/// { "email": "guest@example.com", "code": "482913" }
/// ```
///
/// # Response (200 OK)
///
/// ```json
/// { "status": "verified" }
/// ```
///
/// # Rate Limiting
///
/// 10 attempts per email per 10 minutes on top of the per-code attempt
/// budget enforced by the OTP service.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<OtpVerifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let identifier = format!("otp-verify:{}", request.email.trim().to_lowercase());
    if let Err(retry) = state.limiter.check(&identifier, OTP_VERIFY_MAX, TEN_MINUTES) {
        return Err(AppError::RateLimited {
            retry_after_secs: retry.as_secs_ceil(),
        });
    }

    otp::verify_code(&state.pool, &request.email, &request.code).await?;

    Ok(Json(json!({ "status": "verified" })))
}
