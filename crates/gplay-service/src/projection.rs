//! Field projection over analysis results.

use serde_json::{Map, Value};

/// Keep only the requested fields of a result.
///
/// An object keeps exactly the requested keys, in request order, with
/// `null` for keys it lacks. A list is projected element by element.
/// Any other value is returned unchanged.
#[must_use]
pub fn project(value: &Value, fields: &[String]) -> Value {
    match value {
        Value::Object(object) => {
            let mut projected = Map::with_capacity(fields.len());
            for field in fields {
                let selected = object.get(field).cloned().unwrap_or(Value::Null);
                projected.insert(field.clone(), selected);
            }
            Value::Object(projected)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| project(item, fields)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_object_projection() {
        let app = json!({"title": "WhatsApp", "score": 4.2, "installs": "5B+"});
        let projected = project(&app, &fields(&["score", "title", "developer"]));

        assert_eq!(
            projected,
            json!({"score": 4.2, "title": "WhatsApp", "developer": null})
        );
    }

    #[test]
    fn test_list_projection() {
        let reviews = json!([
            {"score": 5, "text": "great", "userName": "a"},
            {"score": 1, "text": "meh", "userName": "b"}
        ]);
        let projected = project(&reviews, &fields(&["score", "text"]));

        assert_eq!(
            projected,
            json!([{"score": 5, "text": "great"}, {"score": 1, "text": "meh"}])
        );
    }

    #[test]
    fn test_requested_order_is_kept() {
        let projected = project(&json!({"a": 1, "b": 2}), &fields(&["b", "a"]));
        assert_eq!(
            serde_json::to_string(&projected).expect("serialize"),
            r#"{"b":2,"a":1}"#
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let projected = project(&json!({"a": 1, "b": 2}), &fields(&["a", "b", "a"]));
        assert_eq!(projected, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(project(&json!("text"), &fields(&["a"])), json!("text"));
    }
}
