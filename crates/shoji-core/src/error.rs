#![forbid(unsafe_code)]

//! Toolkit error taxonomy.
//!
//! Errors here are the unrecoverable kind: the terminal went away or the
//! hosting application wired the toolkit up wrong. Recoverable outcomes
//! (the operator cancelled, a background operation failed) are modeled
//! as values, not errors; see [`crate::task::TaskOutcome`].

use std::io;

use thiserror::Error;

/// Errors surfaced by the toolkit itself.
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal I/O failed (present, key read, or mode switch).
    #[error("terminal I/O failed")]
    Io(#[from] io::Error),

    /// A second terminal session was opened while one is active.
    #[error("terminal session already active")]
    SessionActive,

    /// The backend has no more input to deliver.
    ///
    /// Only the scripted test backend reports this; a live terminal
    /// blocks instead.
    #[error("input source exhausted")]
    InputExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn display_is_stable() {
        assert_eq!(
            Error::SessionActive.to_string(),
            "terminal session already active"
        );
        assert_eq!(Error::InputExhausted.to_string(), "input source exhausted");
    }
}
