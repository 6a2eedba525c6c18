//! URL assembly from a base, a path template, and substitution values.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::{String, ToString},
    vec::Vec,
};
use serde_json::Value;

/// Builds the final URL for a call.
///
/// Segments of `path` that start with `:` are replaced by the entry of the
/// same name from `values`. Entries that did not substitute a segment are
/// appended as a percent-encoded query string in key order. Null entries
/// neither substitute nor append, and segments without a matching entry are
/// kept literally.
///
/// Substituted text is inserted into the path as-is. If that produces an
/// invalid URL, the error surfaces when the result is parsed as a URI.
pub(crate) fn build(
    base: &str,
    path: &str,
    values: &BTreeMap<String, Value>,
) -> Result<String, serde_urlencoded::ser::Error> {
    let mut used = BTreeSet::new();
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment.strip_prefix(':') {
            Some(name) => match values.get(name) {
                Some(value) if !value.is_null() => {
                    used.insert(name);
                    segments.push(scalar_text(value));
                }
                _ => segments.push(segment.to_string()),
            },
            None => segments.push(segment.to_string()),
        }
    }
    let path = segments.join("/");

    let pairs: Vec<(&str, String)> = values
        .iter()
        .filter(|(name, value)| !used.contains(name.as_str()) && !value.is_null())
        .map(|(name, value)| (name.as_str(), scalar_text(value)))
        .collect();

    let mut url = String::with_capacity(base.len() + path.len() + 1);
    url.push_str(base.trim_end_matches('/'));
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(&path);
    if !pairs.is_empty() {
        let query = serde_urlencoded::to_string(&pairs)?;
        url.push('?');
        url.push_str(&query);
    }
    Ok(url)
}

/// Strings substitute bare; every other value uses its compact JSON form.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(value: Value) -> BTreeMap<String, Value> {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("test values must be an object"),
        }
    }

    #[test]
    fn named_segments_are_substituted() {
        let url = build(
            "https://api.example.com",
            "/users/:id",
            &values(json!({"id": 123})),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/users/123");
    }

    #[test]
    fn leftover_entries_become_the_query_string() {
        let url = build(
            "https://api.example.com",
            "/users/:id",
            &values(json!({"id": 123, "page": 2, "sort": "name"})),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/users/123?page=2&sort=name");
    }

    #[test]
    fn query_keys_are_emitted_in_sorted_order() {
        let url = build(
            "https://api.example.com",
            "/list",
            &values(json!({"b": "2", "a": "1", "c": "3"})),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/list?a=1&b=2&c=3");
    }

    #[test]
    fn null_entries_are_omitted_everywhere() {
        let url = build(
            "https://api.example.com",
            "/users/:id",
            &values(json!({"id": null, "page": null})),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/users/:id");
    }

    #[test]
    fn unmatched_segments_stay_literal() {
        let url = build("https://api.example.com", "/users/:id", &BTreeMap::new()).unwrap();
        assert_eq!(url, "https://api.example.com/users/:id");
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let url = build(
            "https://api.example.com",
            "/search",
            &values(json!({"q": "john doe", "lang": "en/us"})),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/search?lang=en%2Fus&q=john+doe");
    }

    #[test]
    fn slashes_between_base_and_path_are_normalized() {
        let plain = build("https://api.example.com/", "/users", &BTreeMap::new()).unwrap();
        assert_eq!(plain, "https://api.example.com/users");

        let bare = build("https://api.example.com", "users", &BTreeMap::new()).unwrap();
        assert_eq!(bare, "https://api.example.com/users");
    }

    #[test]
    fn scalars_substitute_bare_and_composites_as_json() {
        let url = build(
            "https://api.example.com",
            "/flags/:on/:name",
            &values(json!({"on": true, "name": "beta"})),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/flags/true/beta");

        let url = build(
            "https://api.example.com",
            "/filters/:rule",
            &values(json!({"rule": {"a": 1}})),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/filters/{\"a\":1}");
    }
}
