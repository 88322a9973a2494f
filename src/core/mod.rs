//! Core types shared across the validator.
//!
//! The only core concern today is error handling: the [`ReleaseError`] taxonomy and
//! the [`ErrorContext`] wrapper used by the binary to print fatal errors with
//! suggestions.

pub mod error;

pub use error::{ErrorContext, ReleaseError, format_error_chain, user_friendly_error};
