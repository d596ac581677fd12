//! Shared error-code contract for every error type the crate returns.

/// Grepable `E_*` code alongside the human-readable message.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}
