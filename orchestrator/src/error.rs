//! Error types for the match core.

use thiserror::Error;

pub use arena_shared::ConfigError;

/// Roster mutations that were refused.
///
/// These never escape `Session::tick`; a refused join is logged and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("player {0} is already registered")]
    DuplicateNumber(u32),
    #[error("player number {number} is outside 1..={max}")]
    OutOfRange { number: u32, max: u32 },
    #[error("player {0} is not registered")]
    UnknownPlayer(u32),
}
