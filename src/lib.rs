#![deny(unsafe_code)]
#![no_std]
#![warn(missing_docs, missing_debug_implementations)]
//! A schema-first toolkit for calling JSON APIs from Rust.
//!
//! This crate layers typed request building and validation on top of a
//! pluggable transport. Routes are declared once, as path keys with optional
//! schemas for their params, query, body, and response; every call is then
//! checked against its route before the transport runs and after it returns.
//! It's designed to be no-std compatible with optional standard library
//! features.
//!
//! # Features
//!
//! - **Route registry** - Declare path keys like `"/users/:id"` or `"@put/users/:id"` once and call them by name
//! - **Schema validation** - Async validators guard params, query, body, and response data, and may coerce values
//! - **Method inference** - An `@method` prefix forces the verb; otherwise POST with a body and GET without
//! - **Typed errors** - Declaration mistakes, rejected data, transport failures, and non-success statuses are distinct variants
//! - **Pluggable transports** - Any async function from `Request` to `Response` can deliver calls
//! - **Async/await ready** - Built on top of `futures-lite` for async I/O operations
//!
//! # Optional Features
//!
//! - `std` - Enable standard library support (enabled by default)
//! - `tracing` - Emit per-call events through the `tracing` crate
//!
//! # Examples
//!
//! ## Declaring and calling routes
//!
//! ```rust
//! use core::convert::Infallible;
//! use fetch_kit::schema::{schema_fn, Issues, Validation};
//! use fetch_kit::transport::transport_fn;
//! use fetch_kit::{json, Client, Options, Request, Response, RouteSchema, Routes, Value};
//!
//! async fn require_id(value: Option<Value>) -> Validation {
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
//! let routes = Routes::new().route(
//!     "/users/:id",
//!     RouteSchema::new().params(schema_fn(require_id)),
//! );
//! let client = Client::new("https://api.example.com", routes, transport_fn(deliver));
//!
//! let user = client
//!     .fetch("/users/:id", Options::new().params(json!({"id": 123})))
//!     .await?;
//! assert_eq!(user["name"], "John");
//! # Ok(())
//! # }
//! ```
//!
//! ## Typed responses
//!
//! ```rust
//! use core::convert::Infallible;
//! use fetch_kit::transport::transport_fn;
//! use fetch_kit::{Client, Options, Request, Response, Routes};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! async fn deliver(_request: Request) -> Result<Response, Infallible> {
//!     Ok(Response::new(200, r#"{"id":123,"name":"John"}"#))
//! }
//!
//! # async fn example() -> fetch_kit::Result<()> {
//! let client = Client::new("https://api.example.com", Routes::new(), transport_fn(deliver));
//! let user: User = client.fetch_as("/users/123", Options::new()).await?;
//! assert_eq!(user.id, 123);
//! # Ok(())
//! # }
//! ```
//!
//! ## Shared configuration
//!
//! ```rust
//! use core::convert::Infallible;
//! use fetch_kit::transport::transport_fn;
//! use fetch_kit::{header, CallConfig, Client, Options, Request, Response, Routes};
//!
//! async fn deliver(_request: Request) -> Result<Response, Infallible> {
//!     Ok(Response::new(200, "{}"))
//! }
//!
//! # async fn example() -> fetch_kit::Result<()> {
//! let client = Client::new("https://api.example.com", Routes::new(), transport_fn(deliver))
//!     .with_defaults(CallConfig::new().header(header::AUTHORIZATION, "Bearer shared"));
//!
//! // Per-call headers override the shared ones by name.
//! let config = CallConfig::new().header(header::AUTHORIZATION, "Bearer mine");
//! client.fetch_with("/status", Options::new(), config).await?;
//! # Ok(())
//! # }
//! ```
//!
extern crate alloc;

pub mod error;
pub use error::{BoxError, Error, Result};

mod body;
pub use body::Body;
pub use body::BodyFrozen;
pub use body::Error as BodyError;

mod request;
pub use request::Request;

mod response;
pub use response::Response;

pub mod schema;
#[doc(inline)]
pub use schema::Schema;

pub mod route;
pub use route::{RouteSchema, Routes};

pub mod transport;
#[doc(inline)]
pub use transport::Transport;

pub mod client;
pub use client::{CallConfig, Client, Options};

mod path;
mod url;

pub use serde_json::{json, Value};

pub use http::{
    header, method, uri, version, Extensions, HeaderMap, HeaderName, HeaderValue, Method,
    StatusCode, Uri, Version,
};
