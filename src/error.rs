//! Errors surfaced by this crate's codec construction, encode, and decode.

use thiserror::Error;

/// All failure modes the codec can report. No exceptions-as-control-flow:
/// every fallible operation returns a `Result<_, CodecError>`, and failures
/// leave the codec and caller's buffers unchanged.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CodecError {
    #[error("invalid parameters: m={m}, k={k}, n={n}")]
    InvalidParameters { m: u32, k: usize, n: usize },

    #[error("field width m={m} out of range [2, 16]")]
    InvalidFieldWidth { m: u32 },

    #[error("symbol index {index} out of range for n={n}")]
    InvalidIndex { index: usize, n: usize },

    #[error("duplicate or inconsistent index {index} in decode input")]
    DuplicateIndex { index: usize },

    #[error("singular matrix at column {col}")]
    SingularMatrix { col: usize },

    #[error("symbol buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch { expected: usize, got: usize },
}
