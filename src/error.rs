//! Error handling for decoding operations
//!
//! This module re-exports the error type shared by every decoder. It uses
//! thiserror for ergonomic error handling and provides context-specific
//! error variants.

pub use crate::common::GenesisError;
pub use crate::common::Result;
