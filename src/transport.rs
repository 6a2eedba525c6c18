//! Transport abstraction for delivering requests.
//!
//! This module provides the core [`Transport`] trait and supporting types for
//! plugging a network layer into the client. A transport receives the fully
//! assembled [`Request`] and is responsible for producing a [`Response`].
//!
//! # Core Concepts
//!
//! - **Transport**: A trait for types that can deliver a request and yield a response
//! - **Type Erasure**: Support for dynamic dispatch through [`AnyTransport`]
//! - **Errors**: Each transport brings its own error type; the client boxes it
//!   at the boundary so concrete transports stay interchangeable
//!
//! # Examples
//!
//! ## Basic Transport Implementation
//!
//! ```rust
//! use core::convert::Infallible;
//! use fetch_kit::transport::Transport;
//! use fetch_kit::{Request, Response, StatusCode};
//!
//! struct Echo;
//!
//! impl Transport for Echo {
//!     type Error = Infallible;
//!     async fn send(&self, mut request: Request) -> Result<Response, Self::Error> {
//!         let body = request.take_body().unwrap_or_default();
//!         Ok(Response::new(StatusCode::OK, body))
//!     }
//! }
//! ```
//!
//! ## Transport from a Function
//!
//! ```rust
//! use core::convert::Infallible;
//! use fetch_kit::transport::transport_fn;
//! use fetch_kit::{Request, Response};
//!
//! async fn deliver(_request: Request) -> Result<Response, Infallible> {
//!     Ok(Response::new(200, r#"{"ok":true}"#))
//! }
//!
//! let transport = transport_fn(deliver);
//! ```

use core::{any::type_name, fmt::Debug, future::Future, pin::Pin};

use alloc::{boxed::Box, sync::Arc};

use crate::{error::BoxError, Request, Response};

/// A trait for types that can deliver an HTTP request and yield a response.
///
/// A transport is the last stage of a call: everything before it (validation,
/// URL assembly, header merging) has already happened, and everything after it
/// (status checking, decoding, response validation) happens to what it returns.
///
/// # Implementation Notes
///
/// - Transports take `&self` and must be `Send + Sync`, so one instance can
///   serve any number of concurrent calls without locking
/// - The request is consumed; its body is moved out with `take_body`
/// - A non-success HTTP status is NOT a transport error; return the response
///   and let the client classify it
///
/// # Examples
///
/// ```rust
/// use core::convert::Infallible;
/// use fetch_kit::transport::Transport;
/// use fetch_kit::{Request, Response};
///
/// struct AlwaysNotFound;
///
/// impl Transport for AlwaysNotFound {
///     type Error = Infallible;
///     async fn send(&self, _request: Request) -> Result<Response, Self::Error> {
///         Ok(Response::new(404, "no such resource"))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// The error type returned when delivery itself fails.
    ///
    /// Any error convertible into [`BoxError`] qualifies, which every
    /// `core::error::Error + Send + Sync + 'static` type is.
    type Error: Into<BoxError>;
    /// Delivers the request and yields the raw response.
    fn send(&self, request: Request)
        -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

impl<T: Transport> Transport for &T {
    type Error = T::Error;
    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        Transport::send(*self, request).await
    }
}

impl<T: Transport> Transport for Box<T> {
    type Error = T::Error;
    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        Transport::send(self.as_ref(), request).await
    }
}

impl<T: Transport> Transport for Arc<T> {
    type Error = T::Error;
    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        Transport::send(self.as_ref(), request).await
    }
}

/// A transport built from a function.
///
/// Created by [`transport_fn`].
pub struct TransportFn<F> {
    f: F,
}

impl<F> Debug for TransportFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TransportFn")
    }
}

/// Creates a transport from an async function.
///
/// This is the lightest way to plug in a network layer, and the usual way to
/// fake one in tests.
///
/// # Examples
///
/// ```rust
/// use core::convert::Infallible;
/// use fetch_kit::transport::transport_fn;
/// use fetch_kit::{Request, Response};
///
/// async fn record(request: Request) -> Result<Response, Infallible> {
///     let line = format!("{} {}", request.method(), request.uri());
///     Ok(Response::new(200, line))
/// }
///
/// let transport = transport_fn(record);
/// ```
pub fn transport_fn<F, Fut, E>(f: F) -> TransportFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, E>> + Send,
    E: Into<BoxError>,
{
    TransportFn { f }
}

impl<F, Fut, E> Transport for TransportFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, E>> + Send,
    E: Into<BoxError>,
{
    type Error = E;
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send {
        (self.f)(request)
    }
}

pub(crate) trait TransportImpl: Send + Sync {
    fn send_inner<'this, 'fut>(
        &'this self,
        request: Request,
    ) -> Pin<Box<dyn 'fut + Send + Future<Output = Result<Response, BoxError>>>>
    where
        'this: 'fut;
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Type-erased transport that can hold any transport implementation behind a trait object.
///
/// `AnyTransport` is how the client stores its transport: the concrete type is
/// erased at construction, and delivery errors are boxed into [`BoxError`].
///
/// # Examples
///
/// ```rust
/// use core::convert::Infallible;
/// use fetch_kit::transport::{AnyTransport, Transport};
/// use fetch_kit::{Request, Response};
///
/// struct Echo;
///
/// impl Transport for Echo {
///     type Error = Infallible;
///     async fn send(&self, _request: Request) -> Result<Response, Self::Error> {
///         Ok(Response::empty())
///     }
/// }
///
/// let transport = AnyTransport::new(Echo);
/// println!("transport type: {}", transport.name());
/// ```
pub struct AnyTransport(Box<dyn TransportImpl>);

impl Debug for AnyTransport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("AnyTransport[{}]", self.name()))
    }
}

impl AnyTransport {
    /// Creates a new type-erased transport wrapper around the given transport implementation.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self(Box::new(transport))
    }

    /// Returns the type name of the underlying transport implementation.
    ///
    /// This can be useful for debugging, logging, or introspection purposes.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl<T: Transport> TransportImpl for T {
    fn send_inner<'this, 'fut>(
        &'this self,
        request: Request,
    ) -> Pin<Box<dyn 'fut + Send + Future<Output = Result<Response, BoxError>>>>
    where
        'this: 'fut,
    {
        Box::pin(async move {
            Transport::send(self, request)
                .await
                .map_err(Into::into)
        })
    }
}

impl Transport for AnyTransport {
    type Error = BoxError;
    /// Delivers the request using the underlying transport implementation.
    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        self.0.send_inner(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::convert::Infallible;

    struct Echo;

    impl Transport for Echo {
        type Error = Infallible;
        async fn send(&self, mut request: Request) -> Result<Response, Self::Error> {
            let body = request.take_body().unwrap_or_default();
            Ok(Response::new(200, body))
        }
    }

    #[tokio::test]
    async fn erased_transport_behaves_like_the_original() {
        let transport = AnyTransport::new(Echo);
        let mut request = Request::post("https://api.example.com/echo");
        request.replace_body("ping");

        let mut response = transport.send(request).await.unwrap();
        assert_eq!(response.into_string().await.unwrap().as_str(), "ping");
        assert!(transport.name().contains("Echo"));
    }

    #[tokio::test]
    async fn transports_are_shareable_by_reference() {
        let transport = Arc::new(Echo);
        let request = Request::get("https://api.example.com/a");
        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);

        let by_ref = &Echo;
        let response = by_ref
            .send(Request::get("https://api.example.com/b"))
            .await
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn function_transports_preserve_their_error_type() {
        #[derive(Debug)]
        struct Unreachable;

        impl core::fmt::Display for Unreachable {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("host unreachable")
            }
        }

        impl core::error::Error for Unreachable {}

        async fn fail(_request: Request) -> Result<Response, Unreachable> {
            Err(Unreachable)
        }

        let transport = transport_fn(fail);
        let error = transport
            .send(Request::get("https://api.example.com/x"))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "host unreachable");

        let erased = AnyTransport::new(transport);
        let error = erased
            .send(Request::get("https://api.example.com/x"))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "host unreachable");
    }
}
