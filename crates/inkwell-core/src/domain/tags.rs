//! Tag canonicalization applied on every post write.
//!
//! Stored tags are trimmed, lowercased and unique; filter-time matching relies
//! on that shape. Normalization is never applied retroactively to stored data.

use serde_json::Value;

use crate::error::Violations;

pub const MIN_TAG_LEN: usize = 2;
pub const MAX_TAG_LEN: usize = 30;

/// Trim, lowercase, drop empties and dedupe by first occurrence.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Normalize a JSON tag payload: a single string or an array.
///
/// Array members that are numbers or booleans are stringified; nulls, objects
/// and nested arrays are rejected.
pub fn normalize_tag_value(raw: &Value) -> Result<Vec<String>, Violations> {
    match raw {
        Value::String(s) => Ok(normalize_tags([s])),
        Value::Array(items) => {
            let mut strings = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => strings.push(s.clone()),
                    Value::Number(n) => strings.push(n.to_string()),
                    Value::Bool(b) => strings.push(b.to_string()),
                    _ => {
                        return Err(Violations::single(
                            "tags",
                            "Tags must be strings, numbers or booleans",
                        ));
                    }
                }
            }
            Ok(normalize_tags(strings))
        }
        _ => Err(Violations::single(
            "tags",
            "Tags must be a string or an array of strings",
        )),
    }
}

/// Check already-normalized tags against the storage rules.
pub fn validate_tags(tags: &[String], violations: &mut Violations) {
    if tags.is_empty() {
        violations.push("tags", "At least one tag is required");
        return;
    }
    let valid = tags.iter().all(|tag| {
        let len = tag.chars().count();
        (MIN_TAG_LEN..=MAX_TAG_LEN).contains(&len)
            && tag
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    });
    if !valid {
        violations.push(
            "tags",
            "Each tag must be 2-30 chars and contain only letters, numbers, underscores, or dashes",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_dedupes_case_insensitively() {
        let tags = normalize_tags(["Go", " go ", "GO-lang"]);
        assert_eq!(tags, vec!["go".to_string(), "go-lang".to_string()]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_tags(["  Rust", "async", "RUST", "", "   "]);
        let twice = normalize_tags(&once);
        assert_eq!(once, twice);
        assert_eq!(once, vec!["rust".to_string(), "async".to_string()]);
    }

    #[test]
    fn test_single_string_payload() {
        let tags = normalize_tag_value(&json!("  Tokio ")).unwrap();
        assert_eq!(tags, vec!["tokio".to_string()]);
    }

    #[test]
    fn test_scalars_are_stringified() {
        let tags = normalize_tag_value(&json!(["web", 2024, true])).unwrap();
        assert_eq!(tags, vec!["web", "2024", "true"]);
    }

    #[test]
    fn test_rejects_objects_and_nulls() {
        assert!(normalize_tag_value(&json!(["ok", {"x": 1}])).is_err());
        assert!(normalize_tag_value(&json!(["ok", null])).is_err());
        assert!(normalize_tag_value(&json!(42)).is_err());
    }

    #[test]
    fn test_validate_tags() {
        let mut violations = Violations::new();
        validate_tags(&["go".into(), "snake_case".into(), "кот".into()], &mut violations);
        assert!(violations.is_empty());

        let mut violations = Violations::new();
        validate_tags(&[], &mut violations);
        assert_eq!(violations.errors()[0].message, "At least one tag is required");

        let mut violations = Violations::new();
        validate_tags(&["x".into()], &mut violations);
        assert!(!violations.is_empty());

        let mut violations = Violations::new();
        validate_tags(&["hello world".into()], &mut violations);
        assert!(!violations.is_empty());
    }
}
