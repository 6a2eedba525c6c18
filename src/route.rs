//! Route definitions and the schema registry.
//!
//! A [`RouteSchema`] bundles up to four schemas (params, query, body,
//! response) for one route. A [`Routes`] value maps route keys, exactly as
//! they are later passed to the client, to their schema bundles.
//!
//! Route keys are matched literally. `"/users/:id"` and `"@put/users/:id"`
//! are two different keys even though they address the same path.
//!
//! # Examples
//!
//! ```rust
//! use fetch_kit::schema::{schema_fn, Issues, Validation};
//! use fetch_kit::{RouteSchema, Routes, Value};
//!
//! async fn require_object(value: Option<Value>) -> Validation {
//!     match value {
//!         Some(Value::Object(map)) => Ok(Some(Value::Object(map))),
//!         _ => Err(Issues::single("expected an object")),
//!     }
//! }
//!
//! let routes = Routes::new()
//!     .route(
//!         "/users/:id",
//!         RouteSchema::new().params(schema_fn(require_object)),
//!     )
//!     .route("@post/login", RouteSchema::new());
//!
//! assert_eq!(routes.len(), 2);
//! ```

use alloc::{collections::BTreeMap, string::String};
use serde_json::Value;

use crate::schema::{AnySchema, Field, Schema, ValidationError};

/// The schemas attached to a single route.
///
/// Every field is optional. A field without a schema is not validated; the
/// data passes through the route untouched.
///
/// # Examples
///
/// ```rust
/// use fetch_kit::schema::{schema_fn, Validation};
/// use fetch_kit::{RouteSchema, Value};
///
/// async fn accept(value: Option<Value>) -> Validation {
///     Ok(value)
/// }
///
/// let route = RouteSchema::new()
///     .params(schema_fn(accept))
///     .response(schema_fn(accept));
/// ```
#[derive(Debug, Default)]
pub struct RouteSchema {
    params: Option<AnySchema>,
    query: Option<AnySchema>,
    body: Option<AnySchema>,
    response: Option<AnySchema>,
}

impl RouteSchema {
    /// Creates a route with no schemas attached.
    pub const fn new() -> Self {
        Self {
            params: None,
            query: None,
            body: None,
            response: None,
        }
    }

    /// Sets the schema for path parameters.
    ///
    /// Routes whose key contains named segments (such as `/users/:id`) must
    /// carry a params schema before the client will call them.
    pub fn params(mut self, schema: impl Schema + 'static) -> Self {
        self.params = Some(AnySchema::new(schema));
        self
    }

    /// Sets the schema for query-string parameters.
    pub fn query(mut self, schema: impl Schema + 'static) -> Self {
        self.query = Some(AnySchema::new(schema));
        self
    }

    /// Sets the schema for the request body.
    pub fn body(mut self, schema: impl Schema + 'static) -> Self {
        self.body = Some(AnySchema::new(schema));
        self
    }

    /// Sets the schema for the decoded response body.
    pub fn response(mut self, schema: impl Schema + 'static) -> Self {
        self.response = Some(AnySchema::new(schema));
        self
    }

    /// Returns `true` if the route carries a schema for the given field.
    pub fn validates(&self, field: Field) -> bool {
        self.schema(field).is_some()
    }

    fn schema(&self, field: Field) -> Option<&AnySchema> {
        match field {
            Field::Params => self.params.as_ref(),
            Field::Query => self.query.as_ref(),
            Field::Body => self.body.as_ref(),
            Field::Response => self.response.as_ref(),
        }
    }

    /// Runs the schema for the given field over the value.
    ///
    /// Fields without a schema accept any value and return it unchanged.
    /// When a schema is present, its output value replaces the input, so
    /// coercions become visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] carrying the schema's issues if the
    /// value is rejected.
    pub async fn validate(
        &self,
        field: Field,
        value: Option<Value>,
    ) -> Result<Option<Value>, ValidationError> {
        match self.schema(field) {
            Some(schema) => schema
                .validate(value)
                .await
                .map_err(|issues| ValidationError::new(field, issues)),
            None => Ok(value),
        }
    }
}

/// A registry mapping route keys to their schema bundles.
///
/// Keys are stored and looked up literally, including any method prefix.
/// Calling the client with a key that is not registered is allowed; such
/// calls run with an empty schema bundle.
#[derive(Debug, Default)]
pub struct Routes {
    map: BTreeMap<String, RouteSchema>,
}

impl Routes {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Registers a route under the given key, replacing any previous entry.
    pub fn route(mut self, key: impl Into<String>, schema: RouteSchema) -> Self {
        self.map.insert(key.into(), schema);
        self
    }

    /// Looks up the schema bundle registered under a key.
    pub fn get(&self, key: &str) -> Option<&RouteSchema> {
        self.map.get(key)
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{schema_fn, Issues, Validation};
    use serde_json::json;

    async fn reject_everything(_value: Option<Value>) -> Validation {
        Err(Issues::single("rejected"))
    }

    async fn accept_everything(value: Option<Value>) -> Validation {
        Ok(value)
    }

    #[tokio::test]
    async fn fields_without_schemas_pass_values_through() {
        let route = RouteSchema::new();
        let value = Some(json!({"anything": true}));
        let output = route.validate(Field::Body, value.clone()).await.unwrap();
        assert_eq!(output, value);
        assert!(!route.validates(Field::Body));
    }

    #[tokio::test]
    async fn rejections_carry_the_field_name() {
        let route = RouteSchema::new().query(schema_fn(reject_everything));
        let error = route
            .validate(Field::Query, Some(json!({})))
            .await
            .unwrap_err();
        assert_eq!(error.field(), Field::Query);
        assert_eq!(error.issues().as_slice()[0].message, "rejected");
    }

    #[tokio::test]
    async fn validates_reports_which_fields_are_covered() {
        let route = RouteSchema::new()
            .params(schema_fn(accept_everything))
            .response(schema_fn(accept_everything));
        assert!(route.validates(Field::Params));
        assert!(route.validates(Field::Response));
        assert!(!route.validates(Field::Query));
        assert!(!route.validates(Field::Body));
    }

    #[test]
    fn registry_lookup_is_literal() {
        let routes = Routes::new()
            .route("/users/:id", RouteSchema::new())
            .route("@put/users/:id", RouteSchema::new());
        assert_eq!(routes.len(), 2);
        assert!(routes.get("/users/:id").is_some());
        assert!(routes.get("@put/users/:id").is_some());
        assert!(routes.get("/users").is_none());
    }
}
