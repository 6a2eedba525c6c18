//! Error types and utilities.
//!
//! This module provides the core error handling infrastructure. The main types are:
//!
//! - [`Error`] - The main error type covering every stage of a call
//! - [`Result`] - A specialized Result type alias for fetch operations
//! - [`BoxError`] - A boxed, type-erased error used at transport boundaries
//!
//! Every failure a call can produce is a distinct variant, so callers can match
//! on the stage that failed: schema validation, URL assembly, the transport
//! itself, or decoding of the response.
//!
//! # Examples
//!
//! ```rust
//! use fetch_kit::Error;
//!
//! fn report(error: &Error) {
//!     match error {
//!         Error::Validation(error) => println!("rejected by schema: {error}"),
//!         Error::Status { status, .. } => println!("server answered {status}"),
//!         other => println!("call failed: {other}"),
//!     }
//! }
//! ```
use alloc::boxed::Box;
use core::error::Error as coreError;
use core::fmt::Display;
use http::StatusCode;

use crate::body::Error as BodyError;
use crate::response::Response;
use crate::schema::ValidationError;
use crate::BodyFrozen;

/// A boxed, type-erased error.
///
/// Transports report their failures through this alias so that any concrete
/// error type can flow through the client unchanged.
pub type BoxError = Box<dyn coreError + Send + Sync>;

/// A specialized `Result` type for fetch operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The error type for fetch operations.
///
/// Each variant corresponds to one stage of a call, in roughly the order the
/// stages run: schema checks, URL assembly, sending, and response handling.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A path with named segments was called on a route without a `params` schema.
    MissingParamsSchema,
    /// A schema rejected the params, query, body, or response data.
    Validation(ValidationError),
    /// The assembled URL is not a valid URI.
    Uri(http::uri::InvalidUri),
    /// Serializing the query string failed.
    Query(serde_urlencoded::ser::Error),
    /// Serializing the request body or deserializing the response failed.
    Json(serde_json::Error),
    /// Reading a body failed, or the body was already consumed.
    Body(BodyError),
    /// The transport failed to deliver the request.
    Transport(BoxError),
    /// The server answered with a non-success status code.
    ///
    /// The raw response is carried along undecoded, so callers can inspect
    /// the headers and body of the failed exchange themselves.
    Status {
        /// The status code of the response.
        status: StatusCode,
        /// The raw, undecoded response.
        response: Box<Response>,
    },
}

macro_rules! impl_fetch_error {
    ($(($field:tt,$ty:ty)),*) => {
        $(
            impl From<$ty> for Error {
                fn from(error: $ty) -> Self {
                    Self::$field(error)
                }
            }
        )*

        impl Display for Error {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $(
                        Self::$field(error) => error.fmt(f),
                    )*
                    Self::MissingParamsSchema => f.write_str(
                        "A `params` schema is required for paths with named segments",
                    ),
                    Self::Status { status, .. } => {
                        write!(f, "request failed with status {status}")
                    }
                }
            }
        }

        impl coreError for Error {
            fn source(&self) -> Option<&(dyn coreError + 'static)> {
                match self {
                    $(
                        Self::$field(error) => error.source(),
                    )*
                    _ => None,
                }
            }
        }
    };
}

impl_fetch_error![
    (Validation, ValidationError),
    (Uri, http::uri::InvalidUri),
    (Query, serde_urlencoded::ser::Error),
    (Json, serde_json::Error),
    (Body, BodyError),
    (Transport, BoxError)
];

impl From<BodyFrozen> for Error {
    fn from(_error: BodyFrozen) -> Self {
        Self::Body(BodyError::BodyFrozen)
    }
}

impl Error {
    /// Returns the status code of the response, if the server answered with a
    /// non-success status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn missing_params_schema_names_the_field() {
        let message = Error::MissingParamsSchema.to_string();
        assert!(message.contains("params"));
        assert!(message.contains("schema"));
    }

    #[test]
    fn status_error_reports_the_code() {
        let error = Error::Status {
            status: StatusCode::NOT_FOUND,
            response: Box::new(Response::new(
                StatusCode::NOT_FOUND,
                crate::Body::empty(),
            )),
        };
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
        assert!(error.to_string().contains("404"));
    }
}
