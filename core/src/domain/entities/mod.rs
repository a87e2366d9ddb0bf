//! Domain entities representing core business objects.

pub mod session;

// Re-export commonly used types
pub use session::{
    Session, SessionId, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS,
};
