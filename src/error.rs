//! Error handling for talk table operations
//!
//! This module defines the error types used throughout the decoder.
//! It uses thiserror for ergonomic error handling and provides context-specific
//! error variants.

pub use crate::common::Result;
pub use crate::common::TlkError;
