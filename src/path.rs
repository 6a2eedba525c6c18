//! Route key analysis: method prefixes and named segments.

use http::Method;

/// Splits a leading `@method` prefix off a route key.
///
/// A prefix is an `@` followed by one or more ASCII letters, terminated by a
/// `/` or the end of the key. The letters are upper-cased, so `@get` and
/// `@GET` name the same method, and unknown tokens such as `@custom` become
/// extension methods. Anything else (an empty token, a digit, a symbol) means
/// the key carries no prefix and is returned whole.
///
/// A bare prefix such as `@post` addresses the root path `/`.
pub(crate) fn split_method_prefix(key: &str) -> (Option<Method>, &str) {
    let Some(rest) = key.strip_prefix('@') else {
        return (None, key);
    };
    let token_end = rest.find('/').unwrap_or(rest.len());
    let token = &rest[..token_end];
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_alphabetic()) {
        return (None, key);
    }
    let method = match Method::from_bytes(token.to_ascii_uppercase().as_bytes()) {
        Ok(method) => method,
        Err(_) => return (None, key),
    };
    let path = &rest[token_end..];
    if path.is_empty() {
        (Some(method), "/")
    } else {
        (Some(method), path)
    }
}

/// Returns `true` if the path contains a named segment.
///
/// A named segment is a path separator immediately followed by a colon and at
/// least one identifier character. A trailing bare colon (`/users/:`) does
/// not count.
pub(crate) fn has_named_segments(path: &str) -> bool {
    path.match_indices("/:").any(|(idx, _)| {
        path[idx + 2..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_methods_are_recognized() {
        assert_eq!(
            split_method_prefix("@get/users"),
            (Some(Method::GET), "/users")
        );
        assert_eq!(
            split_method_prefix("@put/users/:id"),
            (Some(Method::PUT), "/users/:id")
        );
        assert_eq!(
            split_method_prefix("@delete/users/123"),
            (Some(Method::DELETE), "/users/123")
        );
    }

    #[test]
    fn prefixes_are_case_insensitive() {
        assert_eq!(
            split_method_prefix("@GeT/users"),
            (Some(Method::GET), "/users")
        );
        assert_eq!(
            split_method_prefix("@POST/login"),
            (Some(Method::POST), "/login")
        );
    }

    #[test]
    fn bare_prefixes_address_the_root() {
        assert_eq!(split_method_prefix("@post"), (Some(Method::POST), "/"));
        assert_eq!(split_method_prefix("@head"), (Some(Method::HEAD), "/"));
    }

    #[test]
    fn unknown_tokens_become_extension_methods() {
        let (method, path) = split_method_prefix("@purge/cache");
        assert_eq!(method.as_ref().map(Method::as_str), Some("PURGE"));
        assert_eq!(path, "/cache");
    }

    #[test]
    fn malformed_prefixes_are_left_alone() {
        assert_eq!(split_method_prefix("@/users"), (None, "@/users"));
        assert_eq!(split_method_prefix("@x9/users"), (None, "@x9/users"));
        assert_eq!(split_method_prefix("@ge-t/users"), (None, "@ge-t/users"));
        assert_eq!(split_method_prefix("@"), (None, "@"));
    }

    #[test]
    fn keys_without_a_prefix_pass_through() {
        assert_eq!(split_method_prefix("/users"), (None, "/users"));
        assert_eq!(split_method_prefix("users@example"), (None, "users@example"));
        assert_eq!(split_method_prefix(""), (None, ""));
    }

    #[test]
    fn named_segments_are_detected() {
        assert!(has_named_segments("/users/:id"));
        assert!(has_named_segments("/:tenant/users"));
        assert!(has_named_segments("/files/:_name"));
        assert!(has_named_segments("/a/:id-x"));
    }

    #[test]
    fn plain_paths_have_no_named_segments() {
        assert!(!has_named_segments("/users"));
        assert!(!has_named_segments("/users/123"));
        assert!(!has_named_segments("/users/:"));
        assert!(!has_named_segments("users:admin"));
        assert!(!has_named_segments(""));
    }
}
