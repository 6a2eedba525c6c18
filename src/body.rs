//! Request/response body handling.
//!
//! This module provides the [`Body`] type used for outbound request payloads and
//! inbound response payloads. A body is an in-memory byte buffer tagged with an
//! optional MIME type, plus a dedicated "frozen" state that marks a body as
//! already consumed.
//!
//! # Body states
//!
//! - **Bytes**: an in-memory payload (possibly empty)
//! - **Frozen**: a consumed body that can no longer provide data
//!
//! The freeze discipline exists so that a body can be moved out of a request or
//! response exactly once; a second extraction fails loudly instead of silently
//! yielding an empty payload.
//!
//! # Examples
//!
//! ```rust
//! use fetch_kit::Body;
//!
//! // Create empty body
//! let empty = Body::empty();
//!
//! // Create from string
//! let text = Body::from_bytes("Hello world!");
//!
//! // Create from bytes
//! let data = Body::from_bytes(vec![1, 2, 3, 4]);
//! ```
//!
//! ## JSON payloads
//!
//! ```rust
//! use fetch_kit::Body;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User { name: String }
//!
//! # async fn example() -> Result<(), fetch_kit::BodyError> {
//! let user = User { name: "Alice".to_string() };
//! let body = Body::from_json(&user)?;
//!
//! let mut body = Body::from_bytes(r#"{"name":"Bob"}"#);
//! let user: User = body.into_json().await?;
//! # Ok(())
//! # }
//! ```
use alloc::{borrow::Cow, boxed::Box, string::String, vec::Vec};
use bytes::Bytes;
use bytestr::ByteStr;
use core::error::Error as coreError;
use core::fmt::{Debug, Display};
use core::mem::{replace, swap};
use core::str::Utf8Error;
use mime::Mime;

macro_rules! impl_error {
    ($ty:ident,$message:expr) => {
        #[doc = concat!("The error type of `", stringify!($ty), "`.")]
        #[derive(Debug)]
        pub struct $ty {
            _priv: (),
        }

        impl $ty {
            pub(crate) fn new() -> Self {
                Self { _priv: () }
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str($message)
            }
        }

        impl core::error::Error for $ty {}
    };
}

impl_error!(
    BodyFrozen,
    "Body was frozen,it may have been consumed by `take()`"
);

/// In-memory payload of a request or response.
///
/// `Body` holds the bytes that travel on the wire, together with an optional
/// MIME tag describing their format. Bodies are consumed destructively: once
/// taken out of a request or response, the slot left behind is frozen and any
/// further read fails with [`BodyFrozen`].
///
/// # Examples
///
/// ```rust
/// use fetch_kit::Body;
///
/// let body = Body::from_bytes("Hello, world!");
/// assert_eq!(body.len(), Some(13));
///
/// let empty = Body::empty();
/// assert_eq!(empty.is_empty(), Some(true));
/// ```
pub struct Body {
    mime: Option<Mime>,
    inner: BodyInner,
}

impl Debug for Body {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Body")
    }
}

enum BodyInner {
    Once(Bytes),
    Freeze,
}

impl Default for BodyInner {
    fn default() -> Self {
        Self::Once(Bytes::new())
    }
}

impl Body {
    /// Creates a new empty body.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let body = Body::empty();
    /// assert_eq!(body.len(), Some(0));
    /// ```
    pub const fn empty() -> Self {
        Self {
            mime: None,
            inner: BodyInner::Once(Bytes::new()),
        }
    }

    /// Creates a new frozen body that cannot provide data.
    ///
    /// A frozen body represents a body that has been consumed and can no longer
    /// provide data. This is typically used internally after a body has been
    /// taken.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let body = Body::frozen();
    /// assert!(body.is_frozen());
    /// ```
    pub const fn frozen() -> Self {
        Self {
            mime: None,
            inner: BodyInner::Freeze,
        }
    }

    /// Creates a body from bytes or byte-like data.
    ///
    /// This method accepts any type that can be converted to `Bytes`,
    /// including `String`, `Vec<u8>`, `&str`, `&[u8]`, and `Bytes` itself.
    /// The conversion is zero-copy when possible.
    ///
    /// By default, the MIME type is set to `application/octet-stream`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let body1 = Body::from_bytes("Hello, world!");
    /// let body2 = Body::from_bytes(vec![72, 101, 108, 108, 111]);
    /// ```
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self {
            mime: Some(mime::APPLICATION_OCTET_STREAM),
            inner: BodyInner::Once(data.into()),
        }
    }

    /// Creates a body from a string.
    ///
    /// This method accepts any type that can be converted to `ByteStr`,
    /// including `String`, `&str`, and `ByteStr` itself.
    ///
    /// By default, the MIME type is set to `text/plain; charset=utf-8`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let body = Body::from_text("Hello, world!");
    /// ```
    pub fn from_text(str: impl Into<ByteStr>) -> Self {
        Self {
            mime: Some(mime::TEXT_PLAIN_UTF_8),
            inner: BodyInner::Once(str.into().into()),
        }
    }

    /// Creates a body by serializing an object to JSON.
    ///
    /// By default, the MIME type is set to `application/json`.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct User {
    ///     name: String,
    ///     age: u32,
    /// }
    ///
    /// let user = User {
    ///     name: "Alice".to_string(),
    ///     age: 30,
    /// };
    ///
    /// let body = Body::from_json(&user)?;
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn from_json<T: serde::Serialize>(value: T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            mime: Some(mime::APPLICATION_JSON),
            ..Self::from_bytes(serde_json::to_string(&value)?)
        })
    }

    /// Returns the MIME type of the body, if known.
    pub fn mime(&self) -> Option<&Mime> {
        self.mime.as_ref()
    }

    /// Sets the MIME type of the body.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let body = Body::from_bytes("<p>hi</p>").with_mime(mime::TEXT_HTML);
    /// assert_eq!(body.mime().unwrap().as_ref(), "text/html");
    /// ```
    pub fn with_mime(mut self, mime: Mime) -> Self {
        self.mime = Some(mime);
        self
    }

    /// Returns the length of the body in bytes, if known.
    ///
    /// Frozen bodies have no length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let body = Body::from_bytes("Hello, world!");
    /// assert_eq!(body.len(), Some(13));
    /// ```
    pub const fn len(&self) -> Option<usize> {
        match &self.inner {
            BodyInner::Once(bytes) => Some(bytes.len()),
            BodyInner::Freeze => None,
        }
    }

    /// Returns whether the body is empty, if the length is known.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let empty = Body::empty();
    /// assert_eq!(empty.is_empty(), Some(true));
    ///
    /// let body = Body::from_bytes("data");
    /// assert_eq!(body.is_empty(), Some(false));
    /// ```
    pub const fn is_empty(&self) -> Option<bool> {
        if let Some(len) = self.len() {
            if len == 0 {
                Some(true)
            } else {
                Some(false)
            }
        } else {
            None
        }
    }

    /// Consumes the body and returns all its data as `Bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is frozen (already consumed).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// # async fn example() -> Result<(), fetch_kit::BodyError> {
    /// let body = Body::from_bytes("Hello, world!");
    /// let bytes = body.into_bytes().await?;
    /// assert_eq!(bytes, "Hello, world!");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn into_bytes(self) -> Result<Bytes, Error> {
        match self.inner {
            BodyInner::Once(bytes) => Ok(bytes),
            BodyInner::Freeze => Err(Error::BodyFrozen),
        }
    }

    /// Consumes the body and returns its data as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is frozen or contains invalid UTF-8
    /// sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// # async fn example() -> Result<(), fetch_kit::BodyError> {
    /// let body = Body::from_bytes("Hello, world!");
    /// let text = body.into_string().await?;
    /// assert_eq!(text, "Hello, world!");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn into_string(self) -> Result<ByteStr, Error> {
        Ok(ByteStr::from_utf8(self.into_bytes().await?)?)
    }

    /// Returns a reference to the body data as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is frozen (already consumed).
    pub async fn as_bytes(&mut self) -> Result<&[u8], Error> {
        match &self.inner {
            BodyInner::Once(bytes) => Ok(bytes),
            BodyInner::Freeze => Err(Error::BodyFrozen),
        }
    }

    /// Returns a reference to the body data as a UTF-8 string slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is frozen or contains invalid UTF-8
    /// sequences.
    pub async fn as_str(&mut self) -> Result<&str, Error> {
        let data = self.as_bytes().await?;
        Ok(core::str::from_utf8(data)?)
    }

    /// Deserializes the body data as JSON into the specified type.
    ///
    /// This method does not inspect the MIME tag; the bytes are handed to the
    /// JSON deserializer as-is. The deserialization is performed with zero-copy
    /// when possible by working directly with the buffered byte data.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is frozen, or if the JSON is malformed or
    /// doesn't match the target type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize, PartialEq, Debug)]
    /// struct User {
    ///     name: String,
    ///     age: u32,
    /// }
    ///
    /// # async fn example() -> Result<(), fetch_kit::BodyError> {
    /// let json_data = r#"{"name": "Alice", "age": 30}"#;
    /// let mut body = Body::from_bytes(json_data);
    /// let user: User = body.into_json().await?;
    /// assert_eq!(user.name, "Alice");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn into_json<'a, T>(&'a mut self) -> Result<T, Error>
    where
        T: serde::Deserialize<'a>,
    {
        Ok(serde_json::from_slice(self.as_bytes().await?)?)
    }

    /// Replaces this body with a new body and returns the old body.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let mut body = Body::from_bytes("original");
    /// let old_body = body.replace(Body::from_bytes("replacement"));
    /// ```
    pub fn replace(&mut self, body: Body) -> Body {
        replace(self, body)
    }

    /// Swaps the contents of this body with another body.
    ///
    /// # Errors
    ///
    /// Returns `BodyFrozen` if this body has been frozen/consumed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let mut body1 = Body::from_bytes("first");
    /// let mut body2 = Body::from_bytes("second");
    ///
    /// body1.swap(&mut body2)?;
    /// # Ok::<(), fetch_kit::BodyError>(())
    /// ```
    pub fn swap(&mut self, body: &mut Body) -> Result<(), BodyFrozen> {
        if self.is_frozen() {
            Err(BodyFrozen::new())
        } else {
            swap(self, body);
            Ok(())
        }
    }

    /// Consumes and takes the body, leaving a frozen body in its place.
    ///
    /// # Errors
    ///
    /// Returns `BodyFrozen` if the body is already frozen.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let mut body = Body::from_bytes("Hello, world!");
    /// let taken_body = body.take()?;
    ///
    /// assert!(body.is_frozen());
    /// # Ok::<(), fetch_kit::BodyError>(())
    /// ```
    pub fn take(&mut self) -> Result<Self, BodyFrozen> {
        if self.is_frozen() {
            Err(BodyFrozen::new())
        } else {
            Ok(self.replace(Self::frozen()))
        }
    }

    /// Returns `true` if the body is frozen (consumed), `false` otherwise.
    ///
    /// A frozen body is different from an empty body, which still has a valid
    /// state but contains no data.
    pub const fn is_frozen(&self) -> bool {
        matches!(self.inner, BodyInner::Freeze)
    }

    /// Freezes the body, making it unusable and dropping its content.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Body;
    ///
    /// let mut body = Body::from_bytes("secret");
    /// body.freeze();
    /// assert!(body.is_frozen());
    /// assert!(body.take().is_err());
    /// ```
    pub fn freeze(&mut self) {
        self.replace(Self::frozen());
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

macro_rules! from_bytes {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Body {
                fn from(data: $ty) -> Self {
                    Body::from_bytes(data)
                }
            }
        )*
    };
}
from_bytes!(Bytes, Vec<u8>, Box<[u8]>, ByteStr, String);

impl<'a> From<Cow<'a, [u8]>> for Body {
    fn from(data: Cow<[u8]>) -> Self {
        Body::from_bytes(data.into_owned())
    }
}

impl From<&[u8]> for Body {
    fn from(data: &[u8]) -> Self {
        Body::from_bytes(data.to_vec())
    }
}

impl From<Box<str>> for Body {
    fn from(data: Box<str>) -> Self {
        Body::from_bytes(ByteStr::from(data))
    }
}

impl<'a> From<Cow<'a, str>> for Body {
    fn from(data: Cow<str>) -> Self {
        data.as_bytes().into()
    }
}

impl From<&str> for Body {
    fn from(data: &str) -> Self {
        data.as_bytes().into()
    }
}

/// Error type for body operations.
///
/// This enum represents the errors that can occur when working with body data:
/// encoding issues, JSON conversion failures, and reads from a consumed body.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid UTF-8 data was encountered when converting body to string.
    Utf8(Utf8Error),
    /// The body has been consumed and cannot provide data anymore.
    ///
    /// This is distinct from a normal empty body - it indicates that the body
    /// was previously taken or frozen and is no longer available for operations.
    BodyFrozen,
    /// JSON serialization or deserialization failed.
    JsonError(serde_json::Error),
}

macro_rules! impl_body_error {
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
                        Self::$field(error) => Display::fmt(error, f),
                    )*
                    Self::BodyFrozen => Display::fmt(&BodyFrozen::new(), f),
                }
            }
        }

        impl coreError for Error {
            fn source(&self) -> Option<&(dyn coreError + 'static)> {
                match self {
                    $(
                        Self::$field(error) => error.source(),
                    )*
                    Error::BodyFrozen => None,
                }
            }
        }
    };
}

impl_body_error![(Utf8, Utf8Error), (JsonError, serde_json::Error)];

impl From<BodyFrozen> for Error {
    fn from(_error: BodyFrozen) -> Self {
        Self::BodyFrozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[tokio::test]
    async fn basic_body_operations() {
        let empty = Body::empty();
        assert_eq!(empty.len(), Some(0));
        assert_eq!(empty.is_empty(), Some(true));
        assert!(!empty.is_frozen());

        let text_body = Body::from_bytes("Hello, World!");
        assert_eq!(text_body.len(), Some(13));
        assert_eq!(text_body.is_empty(), Some(false));

        let result = text_body.into_bytes().await.unwrap();
        assert_eq!(result.as_ref(), b"Hello, World!");
    }

    #[tokio::test]
    async fn body_freeze_and_take() {
        let mut body = Body::from_bytes("test data");
        assert!(!body.is_frozen());

        let taken = Body::take(&mut body).unwrap();
        assert!(body.is_frozen());

        let data = taken.into_bytes().await.unwrap();
        assert_eq!(data.as_ref(), b"test data");

        let result = body.into_bytes().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn body_conversions() {
        let vec_data = vec![1, 2, 3, 4, 5];
        let body = Body::from(vec_data.clone());
        let result = body.into_bytes().await.unwrap();
        assert_eq!(result.as_ref(), vec_data.as_slice());

        let str_data = "string conversion test";
        let body = Body::from(str_data);
        let result = body.into_string().await.unwrap();
        assert_eq!(result.as_str(), str_data);

        let string_data = "owned string test".to_string();
        let expected = string_data.clone();
        let body = Body::from(string_data);
        let result = body.into_string().await.unwrap();
        assert_eq!(result.as_str(), expected);
    }

    #[tokio::test]
    async fn body_replace_and_swap() {
        let mut body = Body::from_bytes("original");
        let old_body = body.replace(Body::from_bytes("replacement"));

        let new_data = body.into_bytes().await.unwrap();
        let old_data = old_body.into_bytes().await.unwrap();

        assert_eq!(new_data.as_ref(), b"replacement");
        assert_eq!(old_data.as_ref(), b"original");

        let mut frozen_body = Body::frozen();
        let mut normal_body = Body::from_bytes("test");
        let result = Body::swap(&mut frozen_body, &mut normal_body);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn json_body_sets_mime() {
        use serde::Serialize;
        #[derive(Serialize)]
        struct Data {
            val: i32,
        }
        let body = Body::from_json(&Data { val: 1 }).unwrap();
        assert_eq!(body.mime().unwrap().as_ref(), "application/json");

        let empty = Body::empty();
        assert!(empty.mime().is_none());
    }

    #[tokio::test]
    async fn invalid_utf8_is_rejected() {
        let mut invalid_body = Body::from_bytes(vec![0xFF, 0xFE, 0xFD]);
        let result = invalid_body.as_str().await;
        assert!(result.is_err());
    }
}
