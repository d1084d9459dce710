//! Error taxonomy shared by the value algebra, signal model, and scheduler.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for every fallible operation the core exposes.
///
/// Variants map directly onto the error taxonomy: configuration errors come
/// from parsing, index/width errors come from [`crate::value::Value`]
/// accessors, usage errors come from [`crate::signal::Register`], and body
/// errors/abort come from the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A sized literal failed to parse (bad radix, malformed digits, or a
    /// digit span wider than the declared size).
    #[error("invalid literal `{literal}`: {reason}")]
    Configuration {
        /// The literal text that failed to parse.
        literal: String,
        /// Human-readable reason for the failure.
        reason: String,
    },
    /// A bit index was outside the width of the value it was applied to.
    #[error("bit index {index} out of range for a {width}-bit value")]
    IndexOutOfRange {
        /// The index that was requested.
        index: u32,
        /// The width of the value the index was applied to.
        width: u32,
    },
    /// A range operation was given a value whose width didn't match.
    #[error("expected a {expected}-bit value for range assignment, got {actual} bits")]
    WidthMismatch {
        /// Width required by the range.
        expected: u32,
        /// Width actually supplied.
        actual: u32,
    },
    /// A register was written more than once in the same simulation event.
    #[error("register `{name}` written more than once in the same event")]
    MultipleAssignment {
        /// Name of the offending register.
        name: String,
    },
    /// A procedural body returned an application-level error.
    #[error("procedural body failed: {0}")]
    Body(String),
    /// The simulation finished (or was torn down) while a body was
    /// suspended in a delay; the body must unwind rather than continue.
    #[error("simulation finished while awaiting a delay")]
    Aborted,
}
