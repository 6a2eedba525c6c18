//! HTTP response implementation.
//!
//! This module provides the [`Response`] type returned by a transport and, on
//! failure, carried inside status errors. It offers methods for:
//!
//! - **Status inspection** - Querying the status code and success range
//! - **Header access** - Reading and modifying HTTP headers
//! - **Body handling** - Consuming the payload as bytes, text, or JSON
//! - **Extensions** - Transport-specific data attached to the response
//!
//! Transports construct responses; the convenient `From` conversions and the
//! builder-style methods exist mostly for transport implementations and tests.
//!
//! # Examples
//!
//! ```rust
//! use fetch_kit::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::OK, r#"{"id":1}"#);
//! assert!(response.is_success());
//!
//! let not_found = Response::new(404, "missing");
//! assert!(!not_found.is_success());
//! ```
use core::fmt::Debug;

use crate::{body::BodyFrozen, Body, BodyError};
use alloc::string::String;
use alloc::vec::Vec;
use bytes::Bytes;
use bytestr::ByteStr;
use http::{header, Extensions, HeaderMap, HeaderName, HeaderValue, StatusCode, Version};

type ResponseParts = http::response::Parts;

/// An HTTP response with status, headers, and body.
///
/// `Response` is what a [`Transport`](crate::transport::Transport) yields.
/// It wraps the standard `http` crate response parts, so converting to and
/// from `http::Response<Body>` is free.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::CREATED, "created");
/// assert_eq!(response.status(), StatusCode::CREATED);
/// ```
#[derive(Debug)]
pub struct Response {
    parts: ResponseParts,
    body: Body,
}

impl From<http::Response<Body>> for Response {
    fn from(response: http::Response<Body>) -> Self {
        let (parts, body) = response.into_parts();
        Self { parts, body }
    }
}

impl From<Response> for http::Response<Body> {
    fn from(response: Response) -> Self {
        Self::from_parts(response.parts, response.body)
    }
}

macro_rules! impl_response_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Response {
                fn from(value: $ty) -> Self {
                    Self::new(StatusCode::OK, value)
                }
            }
        )*
    };
}

impl_response_from![ByteStr, String, Vec<u8>, Bytes, &str, &[u8]];

impl Response {
    /// Creates a new HTTP response with the specified status code and body.
    ///
    /// # Panics
    ///
    /// Panics if `status` cannot be converted into a valid `StatusCode`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::{Response, StatusCode};
    ///
    /// let response = Response::new(200, "Success");
    /// let created = Response::new(StatusCode::CREATED, "Resource created");
    /// ```
    pub fn new<S>(status: S, body: impl Into<Body>) -> Self
    where
        S: TryInto<StatusCode>,
        S::Error: Debug,
    {
        let mut response: Self = http::Response::new(body.into()).into();
        response.set_status(status.try_into().unwrap());
        response
    }

    /// Creates an empty HTTP response with status 200 OK.
    pub fn empty() -> Self {
        Self::new(StatusCode::OK, Body::empty())
    }

    /// Returns the HTTP status code of this response.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::{Response, StatusCode};
    ///
    /// let response = Response::new(404, "Not found");
    /// assert_eq!(response.status(), StatusCode::NOT_FOUND);
    /// ```
    pub const fn status(&self) -> StatusCode {
        self.parts.status
    }

    /// Returns a mutable reference to the HTTP status code.
    pub fn status_mut(&mut self) -> &mut StatusCode {
        &mut self.parts.status
    }

    /// Sets the HTTP status code for this response.
    pub fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    /// Returns `true` if the status code is in the success range (200-299).
    ///
    /// Responses outside this range are turned into status errors by the
    /// client instead of being decoded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Response;
    ///
    /// assert!(Response::new(204, "").is_success());
    /// assert!(!Response::new(301, "").is_success());
    /// assert!(!Response::new(500, "").is_success());
    /// ```
    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    /// Returns the HTTP version for this response.
    pub const fn version(&self) -> Version {
        self.parts.version
    }

    /// Returns a mutable reference to the HTTP version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::{Response, Version};
    ///
    /// let mut response = Response::empty();
    /// *response.version_mut() = Version::HTTP_2;
    /// assert_eq!(response.version(), Version::HTTP_2);
    /// ```
    pub fn version_mut(&mut self) -> &mut Version {
        &mut self.parts.version
    }

    /// Returns a reference to the HTTP headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Returns a mutable reference to the HTTP headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.parts.headers
    }

    /// Returns the first value for the given header name.
    pub fn get_header(&self, name: HeaderName) -> Option<&HeaderValue> {
        self.headers().get(name)
    }

    /// Appends a header value without removing existing values.
    pub fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers_mut().append(name, value);
    }

    /// Inserts a header value, replacing any existing values.
    ///
    /// Returns the previous header value if one existed.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) -> Option<HeaderValue> {
        self.headers_mut().insert(name, value)
    }

    /// Sets an HTTP header and returns the modified response.
    ///
    /// This is a builder-style method that allows method chaining. If you need
    /// to modify an existing response, use [`insert_header`] instead.
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be converted into a valid `HeaderValue`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Response;
    ///
    /// let response = Response::new(200, "OK")
    ///     .header(http::header::CONTENT_TYPE, "application/json");
    /// ```
    ///
    /// [`insert_header`]: Response::insert_header
    pub fn header<V>(mut self, name: HeaderName, value: V) -> Self
    where
        V: TryInto<HeaderValue>,
        V::Error: Debug,
    {
        self.insert_header(name, value.try_into().unwrap());
        self
    }

    /// Returns a reference to the response extensions.
    pub const fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Returns a mutable reference to the response extensions.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    /// Returns a reference to an extension of the specified type.
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions().get()
    }

    /// Removes and returns an extension of the specified type.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions_mut().remove()
    }

    /// Inserts an extension value, returning any previous value of the same type.
    pub fn insert_extension<T: Send + Sync + Clone + 'static>(
        &mut self,
        extension: T,
    ) -> Option<T> {
        self.extensions_mut().insert(extension)
    }

    /// Takes the response body, leaving a frozen (unusable) body in its place.
    ///
    /// # Errors
    ///
    /// Returns `BodyFrozen` if the body has already been taken.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Response;
    ///
    /// let mut response = Response::new(200, "Hello, world!");
    /// let body = response.take_body()?;
    /// assert!(response.take_body().is_err());
    /// # Ok::<(), fetch_kit::BodyError>(())
    /// ```
    pub fn take_body(&mut self) -> Result<Body, BodyFrozen> {
        self.body.take()
    }

    /// Replaces the response body and returns the previous body.
    pub fn replace_body(&mut self, body: impl Into<Body>) -> Body {
        self.body.replace(body.into())
    }

    /// Swaps the response body with another body.
    ///
    /// # Errors
    ///
    /// Returns `BodyFrozen` if the response body has been frozen/consumed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::{Body, Response};
    ///
    /// # async fn example() -> Result<(), fetch_kit::BodyError> {
    /// let mut response = Response::new(200, "original");
    /// let mut staged = Body::from_bytes("swapped in");
    /// response.swap_body(&mut staged)?;
    /// assert_eq!(staged.into_bytes().await?, "original");
    /// # Ok(())
    /// # }
    /// ```
    pub fn swap_body(&mut self, body: &mut Body) -> Result<(), BodyFrozen> {
        self.body.swap(body)
    }

    /// Transforms the response body using the provided function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::{Body, Response};
    ///
    /// let response = Response::new(200, "raw").map_body(|_| Body::from_text("redacted"));
    /// ```
    pub fn map_body<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Body) -> Body,
    {
        self.body = f(self.body);
        self
    }

    /// Sets the body from a JSON-serializable value.
    ///
    /// Serializes the value and sets the `Content-Type` header to
    /// `application/json`.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if JSON serialization fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Response;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct User { name: String, id: u32 }
    ///
    /// let user = User { name: "Alice".to_string(), id: 123 };
    /// let response = Response::empty().json(&user)?;
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.insert_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.replace_body(Body::from_json(value)?);
        Ok(self)
    }

    /// Consumes the response body and returns its data as bytes.
    ///
    /// # Errors
    ///
    /// Returns `BodyError` if the body has already been consumed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Response;
    ///
    /// # async fn example() -> Result<(), fetch_kit::BodyError> {
    /// let mut response = Response::new(200, "Hello, world!");
    /// let bytes = response.into_bytes().await?;
    /// assert_eq!(bytes, "Hello, world!");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn into_bytes(&mut self) -> Result<Bytes, BodyError> {
        self.take_body()?.into_bytes().await
    }

    /// Consumes the response body and returns its data as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `BodyError` if the body has already been consumed or contains
    /// invalid UTF-8 sequences.
    pub async fn into_string(&mut self) -> Result<ByteStr, BodyError> {
        self.take_body()?.into_string().await
    }

    /// Deserializes the response body as JSON into the specified type.
    ///
    /// The `Content-Type` header is not consulted; the bytes are handed to
    /// the JSON deserializer as-is.
    ///
    /// # Errors
    ///
    /// Returns `BodyError` if the body has already been consumed, or if the
    /// JSON is malformed or doesn't match the target type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Response;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct ApiResponse { success: bool }
    ///
    /// # async fn example() -> Result<(), fetch_kit::BodyError> {
    /// let mut response = Response::new(200, r#"{"success": true}"#);
    /// let data: ApiResponse = response.into_json().await?;
    /// assert!(data.success);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn into_json<'a, T>(&'a mut self) -> Result<T, BodyError>
    where
        T: serde::Deserialize<'a>,
    {
        self.body.into_json().await
    }

    /// Sets the `Content-Type` header from a parsed MIME type.
    pub fn mime(mut self, mime: mime::Mime) -> Self {
        self.insert_header(
            header::CONTENT_TYPE,
            HeaderValue::from_str(mime.as_ref()).unwrap(),
        );
        self
    }

    /// Parses the `Content-Type` header and returns a MIME type.
    ///
    /// Returns `None` if the header is missing or invalid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Response;
    ///
    /// let response = Response::new(200, "{}").mime(mime::APPLICATION_JSON);
    /// assert_eq!(response.get_mime(), Some(mime::APPLICATION_JSON));
    ///
    /// let bare = Response::empty();
    /// assert_eq!(bare.get_mime(), None);
    /// ```
    pub fn get_mime(&self) -> Option<mime::Mime> {
        core::str::from_utf8(self.get_header(header::CONTENT_TYPE)?.as_bytes())
            .ok()?
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_only_the_2xx_range() {
        assert!(!Response::new(199, "").is_success());
        assert!(Response::new(200, "").is_success());
        assert!(Response::new(299, "").is_success());
        assert!(!Response::new(300, "").is_success());
        assert!(!Response::new(404, "").is_success());
    }

    #[tokio::test]
    async fn conversions_produce_ok_responses() {
        let mut response: Response = "payload".into();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.into_string().await.unwrap().as_str(), "payload");
    }

    #[tokio::test]
    async fn json_builder_round_trips() {
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize)]
        struct Payload {
            ready: bool,
        }

        let mut response = Response::empty().json(&Payload { ready: true }).unwrap();
        assert_eq!(
            response
                .get_header(header::CONTENT_TYPE)
                .map(HeaderValue::as_bytes),
            Some(&b"application/json"[..])
        );
        let decoded: Payload = response.into_json().await.unwrap();
        assert!(decoded.ready);
    }
}
