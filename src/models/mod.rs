//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// API key credential model
pub mod api_key;
/// Menu item model
pub mod menu_item;
/// Order and order line models
pub mod order;
/// Staff member model
pub mod staff;
/// Email OTP verification model
pub mod verification;
