//! # OTP Gate Core
//!
//! Core logic for issuing and verifying one-time codes bound to a contact
//! identifier. This crate contains the session entity, error types, the
//! in-memory session and rate-limit engine, and the service that ties the
//! engine to delivery channels.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
