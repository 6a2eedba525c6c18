//! Outbound HTTP request implementation.
//!
//! This module provides the [`Request`] type handed to a transport. A request
//! carries the method, URI, headers, extensions, and body of one call:
//!
//! - Create requests for different HTTP methods (GET, POST, PUT, DELETE)
//! - Manipulate request headers and extensions
//! - Attach and consume body payloads, including JSON
//!
//! The client assembles requests itself; constructing them by hand is mostly
//! useful inside transports and tests.
//!
//! # Examples
//!
//! ```rust
//! use fetch_kit::Request;
//!
//! let request = Request::post("https://api.example.com/users")
//!     .header(http::header::AUTHORIZATION, "Bearer token");
//!
//! assert_eq!(request.uri().path(), "/users");
//! ```
use crate::{body::BodyFrozen, Body, BodyError};
use bytes::Bytes;
use bytestr::ByteStr;
use core::fmt::Debug;
use http::{header, Extensions, HeaderMap, HeaderName, HeaderValue, Method, Uri, Version};

type RequestParts = http::request::Parts;

/// An outbound HTTP request with headers, body, and metadata.
///
/// `Request` is what a [`Transport`](crate::transport::Transport) receives:
/// the fully assembled description of one network call. It wraps the standard
/// `http` crate request parts, so converting to and from `http::Request<Body>`
/// is free.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::Request;
/// use http::Method;
///
/// let request = Request::new(Method::PATCH, "https://api.example.com/users/123");
/// assert_eq!(request.method(), &Method::PATCH);
/// ```
#[derive(Debug)]
pub struct Request {
    parts: RequestParts,
    body: Body,
}

impl From<http::Request<Body>> for Request {
    fn from(request: http::Request<Body>) -> Self {
        let (parts, body) = request.into_parts();
        Self { parts, body }
    }
}

impl From<Request> for http::Request<Body> {
    fn from(request: Request) -> Self {
        Self::from_parts(request.parts, request.body)
    }
}

impl Request {
    /// Creates a new request with the specified method and URI.
    ///
    /// The request starts with an empty body and no headers.
    ///
    /// # Panics
    ///
    /// Panics if the URI cannot be parsed into a valid `Uri`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    /// use http::Method;
    ///
    /// let request = Request::new(Method::GET, "https://api.example.com/users");
    /// assert_eq!(request.method(), &Method::GET);
    /// ```
    pub fn new<U>(method: Method, uri: U) -> Self
    where
        U: TryInto<Uri>,
        U::Error: Debug,
    {
        http::Request::builder()
            .method(method)
            .uri(uri.try_into().unwrap())
            .body(Body::empty())
            .unwrap()
            .into()
    }

    /// Creates a new GET request with the specified URI.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    ///
    /// let request = Request::get("https://api.example.com/users");
    /// assert_eq!(request.method(), &http::Method::GET);
    /// ```
    pub fn get<U>(uri: U) -> Self
    where
        U: TryInto<Uri>,
        U::Error: Debug,
    {
        Self::new(Method::GET, uri)
    }

    /// Creates a new POST request with the specified URI.
    pub fn post<U>(uri: U) -> Self
    where
        U: TryInto<Uri>,
        U::Error: Debug,
    {
        Self::new(Method::POST, uri)
    }

    /// Creates a new PUT request with the specified URI.
    pub fn put<U>(uri: U) -> Self
    where
        U: TryInto<Uri>,
        U::Error: Debug,
    {
        Self::new(Method::PUT, uri)
    }

    /// Creates a new DELETE request with the specified URI.
    pub fn delete<U>(uri: U) -> Self
    where
        U: TryInto<Uri>,
        U::Error: Debug,
    {
        Self::new(Method::DELETE, uri)
    }

    /// Returns a reference to the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Returns a mutable reference to the HTTP method.
    pub fn method_mut(&mut self) -> &mut Method {
        &mut self.parts.method
    }

    /// Returns a reference to the request URI.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    ///
    /// let request = Request::get("https://api.example.com/users?page=1");
    /// assert_eq!(request.uri().path(), "/users");
    /// assert_eq!(request.uri().query(), Some("page=1"));
    /// ```
    pub const fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Returns a mutable reference to the request URI.
    pub fn uri_mut(&mut self) -> &mut Uri {
        &mut self.parts.uri
    }

    /// Returns the HTTP version for this request.
    pub const fn version(&self) -> Version {
        self.parts.version
    }

    /// Returns a mutable reference to the HTTP version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    /// use http::Version;
    ///
    /// let mut request = Request::get("https://api.example.com/users");
    /// *request.version_mut() = Version::HTTP_2;
    /// assert_eq!(request.version(), Version::HTTP_2);
    /// ```
    pub fn version_mut(&mut self) -> &mut Version {
        &mut self.parts.version
    }

    /// Sets an HTTP header and returns the modified request.
    ///
    /// This is a builder-style method that allows method chaining. If you need
    /// to modify an existing request, use [`insert_header`] instead.
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be converted into a valid `HeaderValue`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    ///
    /// let request = Request::get("https://api.example.com/users")
    ///     .header(http::header::ACCEPT, "application/json")
    ///     .header(http::header::USER_AGENT, "fetch-kit/1.0");
    /// ```
    ///
    /// [`insert_header`]: Request::insert_header
    pub fn header<V>(mut self, name: HeaderName, value: V) -> Self
    where
        V: TryInto<HeaderValue>,
        V::Error: Debug,
    {
        self.insert_header(name, value.try_into().unwrap());
        self
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
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    ///
    /// let request = Request::get("https://api.example.com/users")
    ///     .header(http::header::ACCEPT, "application/json");
    ///
    /// let accept = request.get_header(http::header::ACCEPT);
    /// assert_eq!(accept.map(|v| v.as_bytes()), Some(&b"application/json"[..]));
    /// ```
    pub fn get_header(&self, name: HeaderName) -> Option<&HeaderValue> {
        self.headers().get(name)
    }

    /// Inserts a header value, replacing any existing values.
    ///
    /// Returns the previous header value if one existed.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) -> Option<HeaderValue> {
        self.headers_mut().insert(name, value)
    }

    /// Appends a header value without removing existing values.
    pub fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers_mut().append(name, value);
    }

    /// Returns a reference to the request extensions.
    ///
    /// Extensions are a type-keyed map for data that doesn't fit into standard
    /// HTTP fields, such as per-call deadlines or tracing ids a transport
    /// knows how to interpret.
    pub const fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Returns a mutable reference to the request extensions.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    /// Returns a reference to an extension of the specified type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    ///
    /// let mut request = Request::get("https://api.example.com/users");
    /// request.insert_extension(42u32);
    /// assert_eq!(request.get_extension::<u32>(), Some(&42));
    /// ```
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

    /// Takes the request body, leaving a frozen (unusable) body in its place.
    ///
    /// Transports call this to move the payload out of the request exactly
    /// once before sending it.
    ///
    /// # Errors
    ///
    /// Returns `BodyFrozen` if the body has already been taken.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    ///
    /// let mut request = Request::post("https://api.example.com/data");
    /// request.replace_body("payload");
    ///
    /// let body = request.take_body()?;
    /// assert!(request.take_body().is_err());
    /// # Ok::<(), fetch_kit::BodyError>(())
    /// ```
    pub fn take_body(&mut self) -> Result<Body, BodyFrozen> {
        self.body.take()
    }

    /// Replaces the request body and returns the previous body.
    pub fn replace_body(&mut self, body: impl Into<Body>) -> Body {
        self.body.replace(body.into())
    }

    /// Swaps the request body with another body.
    ///
    /// # Errors
    ///
    /// Returns `BodyFrozen` if the request body has been frozen/consumed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::{Body, Request};
    ///
    /// # async fn example() -> Result<(), fetch_kit::BodyError> {
    /// let mut request = Request::post("https://api.example.com/data");
    /// request.replace_body("original");
    ///
    /// let mut staged = Body::from_bytes("swapped in");
    /// request.swap_body(&mut staged)?;
    /// assert_eq!(staged.into_bytes().await?, "original");
    /// # Ok(())
    /// # }
    /// ```
    pub fn swap_body(&mut self, body: &mut Body) -> Result<(), BodyFrozen> {
        self.body.swap(body)
    }

    /// Transforms the request body using the provided function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::{Body, Request};
    ///
    /// let request = Request::post("https://api.example.com/data")
    ///     .map_body(|_| Body::from_text("rewritten"));
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
    /// use fetch_kit::Request;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct User { name: String, age: u32 }
    ///
    /// let user = User { name: "Alice".to_string(), age: 30 };
    /// let request = Request::post("https://api.example.com/users").json(&user)?;
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn json<T: serde::Serialize>(mut self, value: T) -> Result<Self, serde_json::Error> {
        self.insert_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.replace_body(Body::from_json(value)?);
        Ok(self)
    }

    /// Consumes the request body and returns its data as bytes.
    ///
    /// # Errors
    ///
    /// Returns `BodyError` if the body has already been consumed.
    pub async fn into_bytes(&mut self) -> Result<Bytes, BodyError> {
        self.take_body()?.into_bytes().await
    }

    /// Consumes the request body and returns its data as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `BodyError` if the body has already been consumed or contains
    /// invalid UTF-8 sequences.
    pub async fn into_string(&mut self) -> Result<ByteStr, BodyError> {
        self.take_body()?.into_string().await
    }

    /// Deserializes the request body as JSON into the specified type.
    ///
    /// The `Content-Type` header is not consulted; the bytes are handed to
    /// the JSON deserializer as-is.
    ///
    /// # Errors
    ///
    /// Returns `BodyError` if the body has already been consumed, or if the
    /// JSON is malformed or doesn't match the target type.
    pub async fn into_json<'a, T>(&'a mut self) -> Result<T, BodyError>
    where
        T: serde::Deserialize<'a>,
    {
        self.body.into_json().await
    }

    /// Sets the `Content-Type` header from a parsed MIME type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fetch_kit::Request;
    ///
    /// let request = Request::post("https://api.example.com/data")
    ///     .mime(mime::APPLICATION_JSON);
    /// ```
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
    /// use fetch_kit::Request;
    ///
    /// let request = Request::post("https://api.example.com/data")
    ///     .mime(mime::APPLICATION_JSON);
    /// assert_eq!(request.get_mime(), Some(mime::APPLICATION_JSON));
    ///
    /// let bare = Request::get("https://api.example.com/users");
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
    fn builder_sets_method_uri_and_headers() {
        let request = Request::new(Method::PATCH, "https://api.example.com/users/123")
            .header(header::ACCEPT, "application/json");

        assert_eq!(request.method(), &Method::PATCH);
        assert_eq!(request.uri().path(), "/users/123");
        assert_eq!(
            request.get_header(header::ACCEPT).map(HeaderValue::as_bytes),
            Some(&b"application/json"[..])
        );
    }

    #[tokio::test]
    async fn json_attaches_body_and_content_type() {
        use serde::Serialize;

        #[derive(Serialize)]
        struct Login<'a> {
            user: &'a str,
        }

        let mut request = Request::post("https://api.example.com/login")
            .json(&Login { user: "alice" })
            .unwrap();

        assert_eq!(
            request
                .get_header(header::CONTENT_TYPE)
                .map(HeaderValue::as_bytes),
            Some(&b"application/json"[..])
        );
        let body = request.into_string().await.unwrap();
        assert_eq!(body.as_str(), r#"{"user":"alice"}"#);
    }

    #[tokio::test]
    async fn body_can_only_be_taken_once() {
        let mut request = Request::post("https://api.example.com/data");
        request.replace_body("payload");

        let body = request.take_body().unwrap();
        assert_eq!(body.into_bytes().await.unwrap().as_ref(), b"payload");
        assert!(request.take_body().is_err());
    }

    #[test]
    fn extensions_round_trip() {
        #[derive(Debug, Clone, PartialEq)]
        struct Deadline(u64);

        let mut request = Request::get("https://api.example.com/users");
        assert!(request.insert_extension(Deadline(30)).is_none());
        assert_eq!(request.get_extension::<Deadline>(), Some(&Deadline(30)));
        assert_eq!(request.remove_extension::<Deadline>(), Some(Deadline(30)));
        assert!(request.get_extension::<Deadline>().is_none());
    }
}
