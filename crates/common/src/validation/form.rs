//! Shape collected validation errors for API responses

use serde_json::{Map, Value};

use super::ValidationError;
use crate::arr::{get_path, set_path};

/// Key used for errors that are not attached to a field
pub const GLOBAL_ERRORS_KEY: &str = "_global";

fn key_for(field: &str) -> &str {
    if field.is_empty() {
        GLOBAL_ERRORS_KEY
    } else {
        field
    }
}

/// Messages grouped by field path, in first-seen order
fn grouped(errors: &ValidationError) -> Vec<(&str, Vec<Value>)> {
    let mut groups: Vec<(&str, Vec<Value>)> = Vec::new();
    for error in &errors.errors {
        let key = key_for(&error.field);
        let message = Value::String(error.message.clone());
        match groups.iter_mut().find(|(field, _)| *field == key) {
            Some((_, messages)) => messages.push(message),
            None => groups.push((key, vec![message])),
        }
    }
    groups
}

/// Nest messages by dotted field path
///
/// `address.city` lands under `{"address": {"city": [...]}}`; each leaf is
/// the list of messages for that field. When a field has errors both on
/// itself and on a child, the child entries win.
///
/// ```
/// use helpkit_common::validation::{errors_to_tree, ValidationError};
/// use serde_json::json;
///
/// let mut errors = ValidationError::field("address.city", "cannot be empty");
/// errors.add_field_error("name", "too short");
///
/// assert_eq!(
///     errors_to_tree(&errors),
///     json!({"address": {"city": ["cannot be empty"]}, "name": ["too short"]})
/// );
/// ```
pub fn errors_to_tree(errors: &ValidationError) -> Value {
    let mut groups = grouped(errors);
    // parents before children so deeper paths overwrite leaf lists
    groups.sort_by_key(|(field, _)| field.split('.').count());

    let mut tree = Value::Object(Map::new());
    for (field, messages) in groups {
        let parts: Vec<&str> = field.split('.').collect();
        for depth in 1..parts.len() {
            let parent = parts[..depth].join(".");
            if get_path(&tree, &parent).is_some_and(Value::is_array) {
                set_path(&mut tree, &parent, Value::Object(Map::new()));
            }
        }
        set_path(&mut tree, field, Value::Array(messages));
    }
    tree
}

/// One entry per field path, messages joined with a space
pub fn errors_to_flat_map(errors: &ValidationError) -> Map<String, Value> {
    grouped(errors)
        .into_iter()
        .map(|(field, messages)| {
            let joined =
                messages.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(" ");
            (field.to_string(), Value::String(joined))
        })
        .collect()
}
