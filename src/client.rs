//! The schema-first API client.
//!
//! This module provides the [`Client`] type that ties the crate together: a
//! route registry, a base URL, optional shared call configuration, and a
//! transport. Each call names a route key, hands over its data as an
//! [`Options`] value, and gets back the validated response payload.
//!
//! # Call pipeline
//!
//! Every call runs the same linear pipeline:
//!
//! 1. Look up the route key (unregistered keys run with an empty bundle)
//! 2. Reject parameterized paths that lack a `params` schema, before anything else
//! 3. Validate params, query, and body concurrently against the route schemas
//! 4. Infer the method: an `@` prefix wins, otherwise POST when a body is
//!    present and GET when it is not
//! 5. Merge headers (shared config, then per-call config, over a default
//!    `Content-Type: application/json`)
//! 6. Build the URL from the base, the path, and the union of params and query
//! 7. Send the request through the transport
//! 8. Classify non-success statuses as errors without touching the body
//! 9. Decode the body as JSON and validate it against the `response` schema
//!
//! # Examples
//!
//! ```rust
//! use core::convert::Infallible;
//! use fetch_kit::schema::{schema_fn, Issues, Validation};
//! use fetch_kit::transport::transport_fn;
//! use fetch_kit::{json, Client, Options, Request, Response, RouteSchema, Routes, Value};
//!
//! async fn user_params(value: Option<Value>) -> Validation {
//!     match value {
//!         Some(Value::Object(map)) if map.contains_key("id") => Ok(Some(Value::Object(map))),
//!         _ => Err(Issues::single("id is required")),
//!     }
//! }
//!
//! async fn deliver(_request: Request) -> Result<Response, Infallible> {
//!     Ok(Response::new(200, r#"{"id":123,"name":"John"}"#))
//! }
//!
//! # async fn example() -> fetch_kit::Result<()> {
//! let client = Client::new(
//!     "https://api.example.com",
//!     Routes::new().route(
//!         "/users/:id",
//!         RouteSchema::new().params(schema_fn(user_params)),
//!     ),
//!     transport_fn(deliver),
//! );
//!
//! let user = client
//!     .fetch("/users/:id", Options::new().params(json!({"id": 123})))
//!     .await?;
//! assert_eq!(user["name"], "John");
//! # Ok(())
//! # }
//! ```

use alloc::{boxed::Box, collections::BTreeMap};
use core::fmt::Debug;

use bytestr::ByteStr;
use futures_lite::future::try_zip;
use http::{header, Extensions, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    path,
    route::{RouteSchema, Routes},
    schema::{Field, ValidationError},
    transport::{AnyTransport, Transport},
    url, Body, Request,
};

static EMPTY_ROUTE: RouteSchema = RouteSchema::new();

/// The data of one call: params, query, and body.
///
/// Each piece is optional, and absence is meaningful: a schema sees `None`
/// for a piece that was never set, and the method inference only counts a
/// body that is present and not JSON `null`.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::{json, Options};
///
/// let options = Options::new()
///     .params(json!({"id": 7}))
///     .query(json!({"expand": "profile"}));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Options {
    params: Option<Value>,
    query: Option<Value>,
    body: Option<Value>,
}

impl Options {
    /// Creates an empty set of call data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path parameters.
    pub fn params(mut self, params: impl Into<Value>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Sets the query parameters.
    pub fn query(mut self, query: impl Into<Value>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the request body.
    ///
    /// Setting the body switches an unprefixed route to POST, unless the
    /// value is JSON `null`, which counts as "no body".
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Request configuration applied outside the validated call data.
///
/// A `CallConfig` carries headers and extensions. The client merges the
/// shared config registered at construction with the per-call config, with
/// the per-call side winning per header name. The HTTP method is never part
/// of the configuration; it comes from the route key or the body inference.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::CallConfig;
///
/// let config = CallConfig::new()
///     .header(http::header::AUTHORIZATION, "Bearer token")
///     .header(http::header::ACCEPT, "application/json");
/// ```
#[derive(Debug, Default, Clone)]
pub struct CallConfig {
    headers: HeaderMap,
    extensions: Extensions,
}

impl CallConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any previous value of the same name.
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be converted into a valid `HeaderValue`.
    pub fn header<V>(mut self, name: HeaderName, value: V) -> Self
    where
        V: TryInto<HeaderValue>,
        V::Error: Debug,
    {
        self.headers.insert(name, value.try_into().unwrap());
        self
    }

    /// Returns the configured headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Stores an extension value for transports to pick up.
    pub fn extension<T: Send + Sync + Clone + 'static>(mut self, extension: T) -> Self {
        self.extensions.insert(extension);
        self
    }
}

/// A schema-first API client over a pluggable transport.
///
/// A client is built once from a base URL, a route registry, and a transport,
/// and is then shared freely: every method takes `&self`, so one instance can
/// serve any number of concurrent calls without synchronization.
///
/// # Examples
///
/// ```rust
/// use core::convert::Infallible;
/// use fetch_kit::transport::transport_fn;
/// use fetch_kit::{CallConfig, Client, Request, Response, Routes};
///
/// async fn deliver(_request: Request) -> Result<Response, Infallible> {
///     Ok(Response::new(200, r#"{"ok":true}"#))
/// }
///
/// let client = Client::new("https://api.example.com", Routes::new(), transport_fn(deliver))
///     .with_defaults(CallConfig::new().header(http::header::USER_AGENT, "fetch-kit/0.1"));
/// ```
#[derive(Debug)]
pub struct Client {
    base_url: ByteStr,
    routes: Routes,
    defaults: CallConfig,
    transport: AnyTransport,
}

impl Client {
    /// Creates a client from a base URL, a route registry, and a transport.
    pub fn new(
        base_url: impl Into<ByteStr>,
        routes: Routes,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            routes,
            defaults: CallConfig::new(),
            transport: AnyTransport::new(transport),
        }
    }

    /// Sets the shared configuration merged into every call.
    pub fn with_defaults(mut self, defaults: CallConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Returns the base URL calls are resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Returns the route registry.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Calls a route and returns the validated response payload.
    ///
    /// `key` is looked up literally in the route registry; keys that were
    /// never registered run with an empty schema bundle. A leading `@method`
    /// prefix (for example `"@put/users/:id"`) forces the HTTP method;
    /// without one the method is POST when [`Options::body`] was set to a
    /// non-null value and GET otherwise.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingParamsSchema`] if the path has named segments but
    ///   the route declares no `params` schema (checked before anything else
    ///   runs; the transport is never invoked)
    /// - [`Error::Validation`] if any schema rejects its data
    /// - [`Error::Status`] if the transport's response has a non-success
    ///   status; the raw response is carried undecoded
    /// - [`Error::Transport`], [`Error::Uri`], [`Error::Query`],
    ///   [`Error::Json`], [`Error::Body`] for failures in the respective
    ///   stages
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::convert::Infallible;
    /// use fetch_kit::transport::transport_fn;
    /// use fetch_kit::{json, Client, Options, Request, Response, Routes};
    ///
    /// async fn deliver(_request: Request) -> Result<Response, Infallible> {
    ///     Ok(Response::new(200, r#"{"created":true}"#))
    /// }
    ///
    /// # async fn example() -> fetch_kit::Result<()> {
    /// let client = Client::new("https://api.example.com", Routes::new(), transport_fn(deliver));
    ///
    /// // Body present: inferred POST
    /// let reply = client
    ///     .fetch("/articles", Options::new().body(json!({"title": "hello"})))
    ///     .await?;
    /// assert_eq!(reply["created"], json!(true));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, key: &str, options: Options) -> Result<Value> {
        self.fetch_with(key, options, CallConfig::new()).await
    }

    /// Calls a route with an additional per-call configuration.
    ///
    /// Per-call headers override shared headers of the same name, and both
    /// override the default `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Same as [`Client::fetch`].
    pub async fn fetch_with(
        &self,
        key: &str,
        options: Options,
        config: CallConfig,
    ) -> Result<Value> {
        let route = self.routes.get(key).unwrap_or(&EMPTY_ROUTE);
        let (forced_method, path) = path::split_method_prefix(key);

        // Declaration errors are preconditions: they fire before any
        // validation and before the transport is ever invoked.
        if path::has_named_segments(path) && !route.validates(Field::Params) {
            return Err(Error::MissingParamsSchema);
        }

        let (params, query, body) = validate_options(route, options).await?;

        let method = match forced_method {
            Some(method) => method,
            None if matches!(&body, Some(value) if !value.is_null()) => Method::POST,
            None => Method::GET,
        };

        let mut values = BTreeMap::new();
        if let Some(Value::Object(map)) = params {
            values.extend(map);
        }
        if let Some(Value::Object(map)) = query {
            values.extend(map);
        }
        let url = url::build(self.base_url.as_str(), path, &values)?;
        let uri: Uri = url.parse()?;

        let mut request = Request::new(method, uri);
        request.insert_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (name, value) in &self.defaults.headers {
            request.insert_header(name.clone(), value.clone());
        }
        for (name, value) in &config.headers {
            request.insert_header(name.clone(), value.clone());
        }

        let mut extensions = self.defaults.extensions.clone();
        extensions.extend(config.extensions);
        *request.extensions_mut() = extensions;

        if let Some(body) = body.filter(|value| !value.is_null()) {
            request.replace_body(Body::from_json(&body)?);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(method = %request.method(), url = %request.uri(), "sending request");

        let mut response = self.transport.send(request).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(status = %response.status(), "received response");

        if !response.is_success() {
            return Err(Error::Status {
                status: response.status(),
                response: Box::new(response),
            });
        }

        let bytes = response.take_body()?.into_bytes().await?;
        let decoded = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        let validated = route.validate(Field::Response, Some(decoded)).await?;
        Ok(validated.unwrap_or(Value::Null))
    }

    /// Calls a route and deserializes the validated payload into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Client::fetch`], plus [`Error::Json`] if the payload does
    /// not match `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::convert::Infallible;
    /// use fetch_kit::transport::transport_fn;
    /// use fetch_kit::{Client, Options, Request, Response, Routes};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct User {
    ///     id: u64,
    ///     name: String,
    /// }
    ///
    /// async fn deliver(_request: Request) -> Result<Response, Infallible> {
    ///     Ok(Response::new(200, r#"{"id":123,"name":"John"}"#))
    /// }
    ///
    /// # async fn example() -> fetch_kit::Result<()> {
    /// let client = Client::new("https://api.example.com", Routes::new(), transport_fn(deliver));
    /// let user: User = client.fetch_as("/users/123", Options::new()).await?;
    /// assert_eq!(user.name, "John");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_as<T: DeserializeOwned>(&self, key: &str, options: Options) -> Result<T> {
        let value = self.fetch(key, options).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Runs the params, query, and body schemas concurrently, failing fast on the
/// first rejection.
async fn validate_options(
    route: &RouteSchema,
    options: Options,
) -> Result<(Option<Value>, Option<Value>, Option<Value>), ValidationError> {
    let Options { params, query, body } = options;
    let ((params, query), body) = try_zip(
        try_zip(
            route.validate(Field::Params, params),
            route.validate(Field::Query, query),
        ),
        route.validate(Field::Body, body),
    )
    .await?;
    Ok((params, query, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_distinguish_unset_from_null() {
        let unset = Options::new();
        assert!(unset.body.is_none());

        let null = Options::new().body(json!(null));
        assert_eq!(null.body, Some(Value::Null));
    }

    #[test]
    fn call_config_headers_replace_by_name() {
        let config = CallConfig::new()
            .header(header::ACCEPT, "text/html")
            .header(header::ACCEPT, "application/json");
        assert_eq!(
            config.headers().get(header::ACCEPT).map(|v| v.as_bytes()),
            Some(&b"application/json"[..])
        );
        assert_eq!(config.headers().len(), 1);
    }
}
