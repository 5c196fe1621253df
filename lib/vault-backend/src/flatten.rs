use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::VaultError;
use crate::report::Reporter;

/// Shape of a secret field as far as flattening is concerned
#[derive(Debug, PartialEq)]
pub enum Field<'a> {
    Leaf(&'a str),
    Nested(&'a Map<String, Value>),
    Unsupported(&'static str),
}

impl<'a> From<&'a Value> for Field<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Field::Leaf(s),
            Value::Object(map) => Field::Nested(map),
            Value::Number(_) => Field::Unsupported("number"),
            Value::Bool(_) => Field::Unsupported("bool"),
            Value::Array(_) => Field::Unsupported("array"),
            Value::Null => Field::Unsupported("null"),
        }
    }
}

/// Writes every string leaf of `value` into `vars` under a slash-joined key.
///
/// Unsupported leaves are reported and skipped; their siblings are still
/// written.
pub fn flatten(
    key: &str,
    value: &Value,
    vars: &mut HashMap<String, String>,
    reporter: &dyn Reporter,
) {
    match Field::from(value) {
        Field::Leaf(s) => {
            vars.insert(strip_data_segments(key), s.to_string());
        }
        Field::Nested(map) => {
            for (name, inner) in map {
                flatten(&join_path(key, name), inner, vars, reporter);
            }
        }
        Field::Unsupported(kind) => reporter.report(&VaultError::UnsupportedValue {
            key: key.to_string(),
            kind,
        }),
    }
}

/// Removes the `data/` segments that kv v2 paths carry
fn strip_data_segments(key: &str) -> String {
    let segments: Vec<&str> = key.split('/').collect();
    let last = segments.len() - 1;
    segments
        .iter()
        .enumerate()
        .filter(|&(i, segment)| !(*segment == "data" && i < last))
        .map(|(_, segment)| *segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Joins and cleans like a unix path: no repeated `/`, `.` and `..` resolved.
///
/// An empty `base` leaves the separator leading, so the result is rooted.
fn join_path(base: &str, name: &str) -> String {
    let rooted = base.is_empty() || base.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in base.split('/').chain(name.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;
    use serde_json::json;

    fn flat(key: &str, value: Value) -> (HashMap<String, String>, Vec<String>) {
        let reporter = CollectingReporter::new();
        let mut vars = HashMap::new();
        flatten(key, &value, &mut vars, &reporter);
        (vars, reporter.messages())
    }

    #[test]
    fn test_flatten_nested() {
        let (vars, warnings) = flat("k", json!({ "a": "1", "b": { "c": "2" } }));

        let expected: HashMap<String, String> = [("k/a", "1"), ("k/b/c", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(vars, expected);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_flatten_skips_unsupported_keeps_siblings() {
        let (vars, warnings) = flat(
            "/secret/app",
            json!({ "port": 5432, "host": "db", "tls": true, "tags": ["a"], "none": null }),
        );

        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("/secret/app/host").map(String::as_str), Some("db"));
        assert_eq!(warnings.len(), 4);
        assert!(warnings.contains(&"type of '/secret/app/port' is not supported (number)".to_string()));
    }

    #[test]
    fn test_flatten_strips_v2_data_segment() {
        let (vars, _) = flat("/secret/data/app", json!({ "user": "admin" }));
        assert_eq!(vars.get("/secret/app/user").map(String::as_str), Some("admin"));
    }

    #[test]
    fn test_flatten_scalar_at_root() {
        let (vars, _) = flat("/kv/token", json!("abc"));
        assert_eq!(vars.get("/kv/token").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_field_classification() {
        assert_eq!(Field::from(&json!("x")), Field::Leaf("x"));
        assert_eq!(Field::from(&json!(1.5)), Field::Unsupported("number"));
        assert!(matches!(Field::from(&json!({})), Field::Nested(_)));
    }

    #[test]
    fn test_strip_data_segments() {
        assert_eq!(strip_data_segments("/secret/data/foo/a"), "/secret/foo/a");
        assert_eq!(strip_data_segments("/secret/metadata/a"), "/secret/metadata/a");
        assert_eq!(strip_data_segments("/secret/app/data"), "/secret/app/data");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/secret/app", "user"), "/secret/app/user");
        assert_eq!(join_path("/secret//app/", "/user"), "/secret/app/user");
        assert_eq!(join_path("k", "a"), "k/a");
        assert_eq!(join_path("/secret/app", "../other"), "/secret/other");
        assert_eq!(join_path("/secret", "./x"), "/secret/x");
    }

    #[test]
    fn test_join_path_empty_base_is_rooted() {
        assert_eq!(join_path("", "a"), "/a");
        assert_eq!(join_path("", "/a/b"), "/a/b");
        assert_eq!(join_path("", ".."), "/");
    }
}
