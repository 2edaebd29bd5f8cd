// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

//! Error handling for the key lifecycle engine. Every fallible operation
//! returns a [Result] whose error carries exactly one service-level
//! [ErrorCode]; richer context (origin errors, free-form messages) rides
//! along for diagnostics but never crosses the service boundary.

use std::error;
use std::fmt;

use serde_json;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// The closed vocabulary of codes reported at the service boundary.
///
/// Success is expressed by the `Ok` arm of [Result]; these are the
/// failure codes only.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum ErrorCode {
    /// An allocation required by the operation could not be satisfied.
    ///
    /// Kept for boundary completeness; the engine itself never raises it
    /// because failed allocations abort the process in Rust.
    MemoryAllocationFailed,
    /// A provider-level failure with no finer classification
    UnknownError,
    /// A declared key parameter does not match the imported material
    ImportParameterMismatch,
    /// The declared padding mode is not usable for the requested purpose
    UnsupportedPaddingMode,
    /// The declared digest is not usable for the requested purpose
    UnsupportedDigest,
    /// The requested purpose is not one the engine can dispatch
    UnsupportedPurpose,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorCode::MemoryAllocationFailed => {
                write!(f, "memory allocation failed")
            }
            ErrorCode::UnknownError => write!(f, "unknown error"),
            ErrorCode::ImportParameterMismatch => {
                write!(f, "import parameter mismatch")
            }
            ErrorCode::UnsupportedPaddingMode => {
                write!(f, "unsupported padding mode")
            }
            ErrorCode::UnsupportedDigest => write!(f, "unsupported digest"),
            ErrorCode::UnsupportedPurpose => write!(f, "unsupported purpose"),
        }
    }
}

/// The error type returned by all fallible operations in this crate
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    origin: Option<Box<dyn error::Error>>,
    errmsg: Option<String>,
    code: ErrorCode,
}

/// Discriminates the broad classes of [Error]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /* A service-level error, see the code Error field */
    CodeError,
    /* The tag was not found in the authorization set, see errmsg */
    TagNotFound,
    /* Other error, see origin */
    Nested,
}

impl Error {
    /// Creates an error from a service code alone
    pub fn new(code: ErrorCode) -> Error {
        Error {
            kind: ErrorKind::CodeError,
            origin: None,
            errmsg: None,
            code: code,
        }
    }

    /// Creates an error that wraps the originating error under the
    /// service code reported to the caller
    pub fn with_source<E>(code: ErrorCode, error: E) -> Error
    where
        E: Into<Box<dyn error::Error>>,
    {
        Error {
            kind: ErrorKind::CodeError,
            origin: Some(error.into()),
            errmsg: None,
            code: code,
        }
    }

    /// Creates an error carrying a diagnostic message
    pub fn with_msg(code: ErrorCode, errmsg: String) -> Error {
        Error {
            kind: ErrorKind::CodeError,
            origin: None,
            errmsg: Some(errmsg),
            code: code,
        }
    }

    /// Creates a tag-not-found error; callers that can default the
    /// missing tag test for this kind via [Error::tag_not_found]
    pub fn not_found(errmsg: String) -> Error {
        Error {
            kind: ErrorKind::TagNotFound,
            origin: None,
            errmsg: Some(errmsg),
            code: ErrorCode::UnknownError,
        }
    }

    /// Creates an error from a generic originating error
    pub fn other_error<E>(error: E) -> Error
    where
        E: Into<Box<dyn error::Error>>,
    {
        Error {
            kind: ErrorKind::Nested,
            origin: Some(error.into()),
            errmsg: None,
            code: ErrorCode::UnknownError,
        }
    }

    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns true if this is a tag-not-found error
    pub fn tag_not_found(&self) -> bool {
        return self.kind == ErrorKind::TagNotFound;
    }

    /// Returns the service code this error maps to at the boundary
    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::CodeError => {
                if let Some(ref e) = self.errmsg {
                    write!(f, "{}", e)
                } else {
                    write!(f, "{}", self.code)
                }
            }
            ErrorKind::TagNotFound => {
                write!(f, "tag not found: {}", self.errmsg.as_ref().unwrap())
            }
            ErrorKind::Nested => self.origin.as_ref().unwrap().fmt(f),
        }
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Error {
        Error::new(code)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::other_error(error)
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(error: std::num::TryFromIntError) -> Error {
        Error::other_error(error)
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(error: std::convert::Infallible) -> Error {
        Error::other_error(error)
    }
}

/// Returns `Err(Error)` built from a service code
#[macro_export]
macro_rules! err_code {
    ($code:expr) => {
        Err($crate::error::Error::new($code))
    };
}

/// Returns `Err(Error)` for a missing authorization tag
#[macro_export]
macro_rules! err_not_found {
    ($err_str:expr) => {
        Err($crate::error::Error::not_found($err_str))
    };
}

/// Builds an [Error] from a service code
#[macro_export]
macro_rules! to_code {
    ($code:expr) => {
        $crate::error::Error::new($code)
    };
}

/// Folds a foreign error into an [Error] under the given service code
#[macro_export]
macro_rules! map_err {
    ($map:expr, $code:expr) => {{
        $map.map_err(|e| $crate::error::Error::with_source($code, e))
    }};
}
