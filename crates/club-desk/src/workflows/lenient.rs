//! Loose coercions for request bodies. Forms post numbers where text is
//! stored and strings where flags are stored, and absent or null fields are
//! accepted as empty.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value))
}

/// A list of text values. A lone scalar becomes a one-element list.
pub(crate) fn texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(value_to_text).collect(),
        scalar => vec![value_to_text(scalar)],
    })
}

pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_flag(&value))
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Flag reading used for stored booleans: the usual spellings of false are
/// false, everything else follows plain truthiness.
pub(crate) fn value_to_flag(value: &Value) -> bool {
    match value {
        Value::String(text) => !matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "0" | "no"
        ),
        other => truthy(other),
    }
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "text")]
        name: String,
        #[serde(default, deserialize_with = "texts")]
        ratings: Vec<String>,
        #[serde(default, deserialize_with = "flag")]
        enabled: bool,
    }

    fn form(value: Value) -> Form {
        serde_json::from_value(value).expect("form deserializes")
    }

    #[test]
    fn numbers_and_nulls_become_text() {
        let parsed = form(json!({ "name": null, "ratings": [5, "4", null, true] }));
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.ratings, vec!["5", "4", "", "true"]);
    }

    #[test]
    fn scalar_rating_becomes_single_entry() {
        assert_eq!(form(json!({ "ratings": 3 })).ratings, vec!["3"]);
        assert!(form(json!({ "ratings": null })).ratings.is_empty());
    }

    #[test]
    fn flag_accepts_string_spellings() {
        assert!(!form(json!({ "enabled": "false" })).enabled);
        assert!(!form(json!({ "enabled": "0" })).enabled);
        assert!(!form(json!({ "enabled": null })).enabled);
        assert!(!form(json!({})).enabled);
        assert!(form(json!({ "enabled": "true" })).enabled);
        assert!(form(json!({ "enabled": 1 })).enabled);
    }
}
