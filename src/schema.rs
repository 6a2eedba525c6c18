//! Schema abstraction for validating call data.
//!
//! This module provides the core [`Schema`] trait and supporting types for
//! validating the params, query, body, and response of a call. A schema
//! receives the raw JSON value handed to the client and either accepts it
//! (possibly replacing it with a coerced value) or rejects it with a list of
//! [`Issues`].
//!
//! # Core Concepts
//!
//! - **Schema**: A trait for types that can validate one piece of call data
//! - **Coercion**: A schema may return a different value than it received;
//!   the returned value is what the client uses from then on
//! - **Type Erasure**: Support for dynamic dispatch through [`AnySchema`]
//! - **Issues**: Structured description of why a value was rejected
//!
//! # Examples
//!
//! ## Basic Schema Implementation
//!
//! ```rust
//! use fetch_kit::schema::{Issues, Schema, Validation};
//! use fetch_kit::Value;
//!
//! struct RequireObject;
//!
//! impl Schema for RequireObject {
//!     async fn validate(&self, value: Option<Value>) -> Validation {
//!         match value {
//!             Some(Value::Object(map)) => Ok(Some(Value::Object(map))),
//!             _ => Err(Issues::single("expected an object")),
//!         }
//!     }
//! }
//! ```
//!
//! ## Schema from a Function
//!
//! ```rust
//! use fetch_kit::schema::{schema_fn, Validation};
//! use fetch_kit::Value;
//!
//! async fn passthrough(value: Option<Value>) -> Validation {
//!     Ok(value)
//! }
//!
//! let schema = schema_fn(passthrough);
//! ```

use core::{any::type_name, fmt::Debug, future::Future, pin::Pin};

use alloc::{boxed::Box, string::String, vec, vec::Vec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome of running a schema against a piece of call data.
///
/// `Ok(value)` accepts the data; the returned value replaces the input, so a
/// schema can coerce as it validates. `Ok(None)` means the data is absent and
/// the schema accepted that. `Err(issues)` rejects the data.
pub type Validation = Result<Option<Value>, Issues>;

/// A single reason a value was rejected.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::schema::Issue;
///
/// let issue = Issue::new("must be a positive integer").at("age");
/// assert_eq!(issue.path.as_deref(), Some("age"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable description of what failed.
    pub message: String,
    /// Location of the offending value inside the data, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Issue {
    /// Creates a new issue with the given message and no location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Attaches a location to the issue.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl core::fmt::Display for Issue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} (at {path})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A non-empty-by-convention list of [`Issue`]s produced by a failed validation.
///
/// Serializes transparently as a JSON array of issues.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::schema::{Issue, Issues};
///
/// let mut issues = Issues::single("name is required");
/// issues.push(Issue::new("must be positive").at("age"));
/// assert_eq!(issues.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Issues(Vec<Issue>);

impl Issues {
    /// Creates an empty issue list.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates an issue list containing a single message with no location.
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![Issue::new(message)])
    }

    /// Appends an issue to the list.
    pub fn push(&mut self, issue: Issue) {
        self.0.push(issue);
    }

    /// Returns the issues as a slice.
    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    /// Returns the number of issues in the list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list contains no issues.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Issue> for Issues {
    fn from(issue: Issue) -> Self {
        Self(vec![issue])
    }
}

impl From<Vec<Issue>> for Issues {
    fn from(issues: Vec<Issue>) -> Self {
        Self(issues)
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = alloc::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl core::fmt::Display for Issues {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for issue in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
            first = false;
        }
        Ok(())
    }
}

/// The four pieces of call data a route schema can validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Path parameters substituted into named segments.
    Params,
    /// Query-string parameters.
    Query,
    /// The request body.
    Body,
    /// The decoded response body.
    Response,
}

impl Field {
    /// Returns the field name as it appears in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Params => "params",
            Self::Query => "query",
            Self::Body => "body",
            Self::Response => "response",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a schema rejects a piece of call data.
///
/// The display form embeds the issue list serialized as JSON, so the full
/// structured detail survives even when the error is only seen as text.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::schema::{Field, Issues, ValidationError};
///
/// let error = ValidationError::new(Field::Body, Issues::single("bad"));
/// assert!(error.to_string().starts_with("Validation failed"));
/// ```
#[derive(Debug)]
pub struct ValidationError {
    field: Field,
    issues: Issues,
}

impl ValidationError {
    /// Creates a new validation error for the given field.
    pub fn new(field: Field, issues: impl Into<Issues>) -> Self {
        Self {
            field,
            issues: issues.into(),
        }
    }

    /// Returns which field was rejected.
    pub fn field(&self) -> Field {
        self.field
    }

    /// Returns the issues the schema reported.
    pub fn issues(&self) -> &Issues {
        &self.issues
    }

    /// Consumes the error and returns the issues.
    pub fn into_issues(self) -> Issues {
        self.issues
    }
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let issues = serde_json::to_string(&self.issues).map_err(|_| core::fmt::Error)?;
        write!(f, "Validation failed: {issues}")
    }
}

impl core::error::Error for ValidationError {}

/// A trait for types that can validate one piece of call data.
///
/// Schemas receive the value as an `Option` so they can distinguish absent
/// data (`None`) from explicit JSON `null` (`Some(Value::Null)`). The value
/// a schema returns replaces the one it received, which allows schemas to
/// coerce data while validating it.
///
/// # Implementation Notes
///
/// - Schemas must be `Send + Sync` so a client can run them concurrently
/// - Validation takes `&self`; a schema is never mutated by being run
/// - Returning `Ok(None)` accepts the absence of data
///
/// # Examples
///
/// ```rust
/// use fetch_kit::schema::{Issues, Schema, Validation};
/// use fetch_kit::{json, Value};
///
/// struct CoerceId;
///
/// impl Schema for CoerceId {
///     async fn validate(&self, value: Option<Value>) -> Validation {
///         match value {
///             Some(Value::Object(mut map)) => {
///                 if let Some(id) = map.get("id").and_then(Value::as_str) {
///                     if let Ok(id) = id.parse::<u64>() {
///                         map.insert("id".into(), json!(id));
///                         return Ok(Some(Value::Object(map)));
///                     }
///                 }
///                 Err(Issues::single("id must be an integer"))
///             }
///             _ => Err(Issues::single("expected an object")),
///         }
///     }
/// }
/// ```
pub trait Schema: Send + Sync {
    /// Validates a piece of call data.
    ///
    /// Returns the (possibly coerced) value on success, or the issues that
    /// caused the rejection.
    fn validate(&self, value: Option<Value>) -> impl Future<Output = Validation> + Send;
}

impl<S: Schema> Schema for &S {
    async fn validate(&self, value: Option<Value>) -> Validation {
        Schema::validate(*self, value).await
    }
}

impl<S: Schema> Schema for Box<S> {
    async fn validate(&self, value: Option<Value>) -> Validation {
        Schema::validate(self.as_ref(), value).await
    }
}

/// A schema built from a validation function.
///
/// Created by [`schema_fn`].
pub struct SchemaFn<F> {
    f: F,
}

impl<F> Debug for SchemaFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SchemaFn")
    }
}

/// Creates a schema from an async validation function.
///
/// This is the lightest way to attach validation to a route when defining a
/// dedicated schema type is not worth it.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::schema::{schema_fn, Issues, Validation};
/// use fetch_kit::Value;
///
/// async fn require_present(value: Option<Value>) -> Validation {
///     match value {
///         Some(value) => Ok(Some(value)),
///         None => Err(Issues::single("value is required")),
///     }
/// }
///
/// let schema = schema_fn(require_present);
/// ```
pub fn schema_fn<F, Fut>(f: F) -> SchemaFn<F>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Validation> + Send,
{
    SchemaFn { f }
}

impl<F, Fut> Schema for SchemaFn<F>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Validation> + Send,
{
    fn validate(&self, value: Option<Value>) -> impl Future<Output = Validation> + Send {
        (self.f)(value)
    }
}

pub(crate) trait SchemaImpl: Send + Sync {
    fn validate_inner<'this, 'fut>(
        &'this self,
        value: Option<Value>,
    ) -> Pin<Box<dyn 'fut + Send + Future<Output = Validation>>>
    where
        'this: 'fut;
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Type-erased schema that can hold any schema implementation behind a trait object.
///
/// `AnySchema` is how a route stores its schemas: each of the four fields of a
/// route can carry a different concrete schema type, erased into a common
/// representation.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::schema::{AnySchema, Issues, Schema, Validation};
/// use fetch_kit::Value;
///
/// struct RejectAll;
///
/// impl Schema for RejectAll {
///     async fn validate(&self, _value: Option<Value>) -> Validation {
///         Err(Issues::single("nothing is allowed"))
///     }
/// }
///
/// let schema = AnySchema::new(RejectAll);
/// println!("schema type: {}", schema.name());
/// ```
pub struct AnySchema(Box<dyn SchemaImpl>);

impl Debug for AnySchema {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("AnySchema[{}]", self.name()))
    }
}

impl AnySchema {
    /// Creates a new type-erased schema wrapper around the given schema implementation.
    pub fn new(schema: impl Schema + 'static) -> Self {
        Self(Box::new(schema))
    }

    /// Returns the type name of the underlying schema implementation.
    ///
    /// This can be useful for debugging, logging, or introspection purposes.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl<S: Schema> SchemaImpl for S {
    fn validate_inner<'this, 'fut>(
        &'this self,
        value: Option<Value>,
    ) -> Pin<Box<dyn 'fut + Send + Future<Output = Validation>>>
    where
        'this: 'fut,
    {
        Box::pin(self.validate(value))
    }
}

impl Schema for AnySchema {
    /// Validates the data using the underlying schema implementation.
    async fn validate(&self, value: Option<Value>) -> Validation {
        self.0.validate_inner(value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use serde_json::json;

    struct UppercaseName;

    impl Schema for UppercaseName {
        async fn validate(&self, value: Option<Value>) -> Validation {
            match value {
                Some(Value::Object(mut map)) => {
                    let Some(name) = map.get("name").and_then(Value::as_str) else {
                        return Err(Issues::single("name is required"));
                    };
                    let name = name.to_uppercase();
                    map.insert("name".into(), Value::String(name));
                    Ok(Some(Value::Object(map)))
                }
                other => Ok(other),
            }
        }
    }

    #[tokio::test]
    async fn schema_can_coerce_values() {
        let schema = UppercaseName;
        let output = schema
            .validate(Some(json!({"name": "alice"})))
            .await
            .unwrap();
        assert_eq!(output, Some(json!({"name": "ALICE"})));
    }

    #[tokio::test]
    async fn schema_distinguishes_absent_from_null() {
        let schema = UppercaseName;
        assert_eq!(schema.validate(None).await.unwrap(), None);
        assert_eq!(
            schema.validate(Some(Value::Null)).await.unwrap(),
            Some(Value::Null)
        );
    }

    #[tokio::test]
    async fn erased_schema_behaves_like_the_original() {
        let schema = AnySchema::new(UppercaseName);
        let output = schema
            .validate(Some(json!({"name": "bob"})))
            .await
            .unwrap();
        assert_eq!(output, Some(json!({"name": "BOB"})));
        assert!(schema.name().contains("UppercaseName"));
    }

    #[tokio::test]
    async fn schema_fn_wraps_async_functions() {
        async fn require_string(value: Option<Value>) -> Validation {
            match value {
                Some(Value::String(s)) => Ok(Some(Value::String(s))),
                _ => Err(Issues::single("expected a string")),
            }
        }

        let schema = schema_fn(require_string);
        assert!(schema.validate(Some(json!("ok"))).await.is_ok());
        assert!(schema.validate(Some(json!(42))).await.is_err());
    }

    #[test]
    fn issues_serialize_as_a_plain_array() {
        let mut issues = Issues::single("bad");
        assert_eq!(
            serde_json::to_string(&issues).unwrap(),
            r#"[{"message":"bad"}]"#
        );

        issues.push(Issue::new("too long").at("name"));
        assert_eq!(
            serde_json::to_string(&issues).unwrap(),
            r#"[{"message":"bad"},{"message":"too long","path":"name"}]"#
        );
    }

    #[test]
    fn validation_error_embeds_serialized_issues() {
        let error = ValidationError::new(Field::Body, Issues::single("bad"));
        assert_eq!(
            error.to_string(),
            r#"Validation failed: [{"message":"bad"}]"#
        );
        assert_eq!(error.field(), Field::Body);
    }

    #[test]
    fn field_names_match_error_messages() {
        assert_eq!(Field::Params.as_str(), "params");
        assert_eq!(Field::Query.as_str(), "query");
        assert_eq!(Field::Body.as_str(), "body");
        assert_eq!(Field::Response.as_str(), "response");
    }
}
