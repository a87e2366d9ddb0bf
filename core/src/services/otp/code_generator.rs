//! Numeric code generation from the operating system's secure RNG

use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::CODE_LENGTH;
use crate::errors::{OtpError, OtpResult};

/// Largest multiple of 10 that fits in a byte; bytes at or above it are redrawn
const REJECTION_BOUND: u8 = 250;

/// Source of verification codes
pub trait CodeGenerator: Send + Sync {
    /// Produce one fresh code
    fn generate(&self) -> OtpResult<String>;
}

/// Uniform decimal codes drawn from `OsRng`
#[derive(Debug, Clone, Copy)]
pub struct SecureCodeGenerator {
    length: usize,
}

impl SecureCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for SecureCodeGenerator {
    fn default() -> Self {
        Self::new(CODE_LENGTH)
    }
}

impl CodeGenerator for SecureCodeGenerator {
    fn generate(&self) -> OtpResult<String> {
        let mut code = String::with_capacity(self.length);
        let mut buf = [0u8; 16];

        while code.len() < self.length {
            OsRng
                .try_fill_bytes(&mut buf)
                .map_err(|e| OtpError::RandomSourceFailure {
                    message: e.to_string(),
                })?;

            for byte in buf.iter().copied() {
                if code.len() == self.length {
                    break;
                }
                // Rejection sampling keeps every digit uniform over 0-9
                if byte < REJECTION_BOUND {
                    code.push(char::from(b'0' + byte % 10));
                }
            }
        }

        Ok(code)
    }
}

/// Generate a default-length code
pub fn generate_code() -> OtpResult<String> {
    SecureCodeGenerator::default().generate()
}
