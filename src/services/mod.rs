//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and complex operations.

pub mod api_keys;
pub mod orders;
pub mod otp;
pub mod pricing;
pub mod rate_limit;
pub mod session;
pub mod staff;
