//! Dotted-path lookup over JSON-shaped records.

use serde_json::Value;

use crate::filtering::FieldPath;

/// Every value `path` reaches inside `record`.
///
/// Objects are entered by key. On an array, a numeric segment selects one element and
/// any other segment is looked up in each element, so `tags.name` reaches the `name`
/// of every tag. An empty result means the path does not exist on the record.
#[must_use]
pub fn resolve<'a>(record: &'a Value, path: &FieldPath) -> Vec<&'a Value> {
    path.segments().iter().fold(vec![record], |current, segment| {
        current
            .into_iter()
            .flat_map(|value| step(value, segment))
            .collect()
    })
}

/// First value reached by `path`, if any
#[must_use]
pub fn resolve_first<'a>(record: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    resolve(record, path).into_iter().next()
}

fn step<'a>(value: &'a Value, segment: &str) -> Vec<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment).into_iter().collect(),
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) => items.get(index).into_iter().collect(),
            Err(_) => items
                .iter()
                .filter_map(|item| item.as_object().and_then(|map| map.get(segment)))
                .collect(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    #[test]
    fn test_nested_object() {
        let record = json!({"details": {"address": {"country": "USA"}}});
        assert_eq!(resolve(&record, &path("details.address.country")), vec![&json!("USA")]);
    }

    #[test]
    fn test_missing_key() {
        let record = json!({"id": 1});
        assert!(resolve(&record, &path("name")).is_empty());
        assert!(resolve(&record, &path("id.value")).is_empty());
    }

    #[test]
    fn test_array_index_and_fan_out() {
        let record = json!({"tags": [{"name": "rust"}, {"name": "sql"}, {"other": 1}]});
        assert_eq!(resolve(&record, &path("tags.1.name")), vec![&json!("sql")]);
        assert_eq!(resolve(&record, &path("tags.name")), vec![&json!("rust"), &json!("sql")]);
        assert!(resolve(&record, &path("tags.9.name")).is_empty());
    }

    #[test]
    fn test_resolve_first() {
        let record = json!({"tags": [{"name": "rust"}, {"name": "sql"}]});
        assert_eq!(resolve_first(&record, &path("tags.name")), Some(&json!("rust")));
    }
}
