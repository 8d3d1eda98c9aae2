use trackable::error::ErrorKind as TrackableErrorKind;
use trackable::error::TrackableError;

/// The error type for this crate.
pub type Error = TrackableError<ErrorKind>;

/// A list of error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid input.
    Invalid,

    /// Unknown error.
    Other,
}
impl TrackableErrorKind for ErrorKind {}
