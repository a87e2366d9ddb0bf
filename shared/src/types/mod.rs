//! Type definitions shared by the HTTP layer
//!
//! - `response` - API response envelopes

pub mod response;

pub use response::{ApiResponse, ErrorResponse};
