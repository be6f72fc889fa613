//! Array helpers
//!
//! Loosely typed "arrays" (lists and maps mixed freely) are represented as
//! [`serde_json::Value`]. Paths use dot notation: `"items.0.name"` walks the
//! `items` key, the first list element, then its `name` key.
//!
//! - [`multisort`]: multi-key sorting of rows
//! - [`natural`]: natural ("human") string ordering

pub mod multisort;
pub mod natural;

use std::collections::BTreeMap;

use num_traits::ToPrimitive;
use serde_json::{Map, Value};

pub use multisort::{sort_by_criteria, sort_recursive, MultiSorter, SortCriterion};
pub use natural::{natural_cmp, natural_cmp_ci};

/// Find the value nearest to `target`
///
/// Works for every primitive number. On a tie the first candidate wins.
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// use helpkit_common::arr::get_closest;
///
/// assert_eq!(get_closest(&[1, 5, 10, 20], 7), Some(5));
/// assert_eq!(get_closest(&[1.5, 2.5], 2.0), Some(1.5));
/// assert_eq!(get_closest::<u64>(&[100, 2_000], 900), Some(100));
/// assert_eq!(get_closest::<i32>(&[], 3), None);
/// ```
pub fn get_closest<T>(values: &[T], target: T) -> Option<T>
where
    T: Copy + ToPrimitive,
{
    let target = target.to_f64()?;
    let mut best: Option<(T, f64)> = None;

    for &candidate in values {
        let Some(value) = candidate.to_f64() else {
            continue;
        };
        let distance = (value - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(value, _)| value)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|segment| !segment.is_empty())
}

/// Read a nested value by dot path
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Write a nested value by dot path, creating intermediate objects
///
/// List elements are addressed by index; an index equal to the list length
/// appends. A key that is not a usable index turns the list into an object
/// keyed `"0"`, `"1"`, ... so no element is lost. Any scalar met on the way
/// is replaced by an object.
///
/// ```
/// use helpkit_common::arr::set_path;
/// use serde_json::json;
///
/// let mut value = json!({"tags": ["a", "b"]});
/// set_path(&mut value, "tags.2", json!("c"));
/// set_path(&mut value, "tags.main", json!("a"));
/// assert_eq!(value, json!({"tags": {"0": "a", "1": "b", "2": "c", "main": "a"}}));
/// ```
pub fn set_path(target: &mut Value, path: &str, value: Value) {
    let parts: Vec<&str> = segments(path).collect();
    let Some((last, parents)) = parts.split_last() else {
        *target = value;
        return;
    };

    let mut current = target;
    for segment in parents {
        current = child_mut(current, segment);
    }
    *child_mut(current, last) = value;
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let list_index = match (&*node, segment.parse::<usize>()) {
        (Value::Array(items), Ok(index)) if index <= items.len() => Some(index),
        _ => None,
    };
    if list_index.is_none() {
        let replacement = match &mut *node {
            Value::Object(_) => None,
            Value::Array(items) => Some(
                std::mem::take(items)
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item))
                    .collect(),
            ),
            _ => Some(Map::new()),
        };
        if let Some(map) = replacement {
            *node = Value::Object(map);
        }
    }

    match (node, list_index) {
        (Value::Array(items), Some(index)) => {
            if index == items.len() {
                items.push(Value::Null);
            }
            &mut items[index]
        }
        (Value::Object(map), _) => map.entry(segment.to_string()).or_insert(Value::Null),
        (other, _) => other,
    }
}

/// Remove a nested value by dot path and return it
pub fn remove_path(target: &mut Value, path: &str) -> Option<Value> {
    let parts: Vec<&str> = segments(path).collect();
    let (last, parents) = parts.split_last()?;

    let mut current = target;
    for segment in parents {
        current = match current {
            Value::Object(map) => map.get_mut(*segment)?,
            Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    match current {
        Value::Object(map) => map.remove(*last),
        Value::Array(items) => {
            let index = last.parse::<usize>().ok()?;
            (index < items.len()).then(|| items.remove(index))
        }
        _ => None,
    }
}

/// Flatten nested objects and lists into a single map keyed by dot path
///
/// Empty objects and lists are kept as leaves so that [`unflatten`] can
/// restore them.
pub fn flatten(value: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut Map<String, Value>) {
    let join = |key: &str| if prefix.is_empty() { key.to_string() } else { format!("{prefix}.{key}") };

    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(child, join(key), out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, join(&index.to_string()), out);
            }
        }
        leaf => {
            out.insert(prefix, leaf.clone());
        }
    }
}

/// Rebuild a nested value from a dot-path map
///
/// Objects whose keys are exactly `0..n` become lists.
pub fn unflatten(flat: &Map<String, Value>) -> Value {
    let mut root = Value::Object(Map::new());
    for (path, value) in flat {
        set_path(&mut root, path, value.clone());
    }
    listify(root)
}

fn listify(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sequential = !map.is_empty()
                && (0..map.len()).all(|index| map.contains_key(&index.to_string()));
            if sequential {
                let mut map = map;
                let items =
                    (0..map.len()).filter_map(|i| map.remove(&i.to_string())).map(listify).collect();
                Value::Array(items)
            } else {
                Value::Object(map.into_iter().map(|(k, v)| (k, listify(v))).collect())
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(listify).collect()),
        other => other,
    }
}

/// Keep only the listed keys
pub fn only(map: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    map.iter().filter(|(key, _)| keys.contains(&key.as_str())).map(|(k, v)| (k.clone(), v.clone())).collect()
}

/// Drop the listed keys
pub fn except(map: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    map.iter().filter(|(key, _)| !keys.contains(&key.as_str())).map(|(k, v)| (k.clone(), v.clone())).collect()
}

/// Collect the value at `path` from every row that has one
pub fn pluck(rows: &[Value], path: &str) -> Vec<Value> {
    rows.iter().filter_map(|row| get_path(row, path)).cloned().collect()
}

/// String form of a value used as a grouping key
///
/// Strings are used verbatim, missing values and null map to `""`.
pub fn key_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Group rows by the value at `path`, preserving row order inside groups
pub fn group_by(rows: &[Value], path: &str) -> BTreeMap<String, Vec<Value>> {
    let mut groups: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for row in rows {
        groups.entry(key_string(get_path(row, path))).or_default().push(row.clone());
    }
    groups
}

/// Index rows by the value at `path`; later rows win on duplicate keys
pub fn index_by(rows: &[Value], path: &str) -> BTreeMap<String, Value> {
    rows.iter().map(|row| (key_string(get_path(row, path)), row.clone())).collect()
}

/// Whether the value is a list, or an object keyed exactly `"0".."n-1"`
pub fn is_list(value: &Value) -> bool {
    match value {
        Value::Array(_) => true,
        Value::Object(map) => (0..map.len()).all(|index| map.contains_key(&index.to_string())),
        _ => false,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Recursively drop nulls, empty strings, empty lists and empty objects
///
/// `false` and `0` are kept.
pub fn remove_empty(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), remove_empty(child)))
                .filter(|(_, child)| !is_empty_value(child))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items.iter().map(remove_empty).filter(|child| !is_empty_value(child)).collect(),
        ),
        other => other.clone(),
    }
}

/// Split a slice into owned chunks of `size`; the last chunk may be shorter
///
/// A `size` of zero yields no chunks.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    //! Unit tests for arr.
    use serde_json::json;

    use super::*;

    /// Validates `get_closest` for the tie scenario.
    ///
    /// Assertions:
    /// - Confirms the first of two equally distant candidates is returned.
    /// - Confirms an exact match wins.
    #[test]
    fn test_get_closest_prefers_first_on_tie() {
        assert_eq!(get_closest(&[4, 8], 6), Some(4));
        assert_eq!(get_closest(&[8, 4], 6), Some(8));
        assert_eq!(get_closest(&[3, 6, 9], 6), Some(6));
        assert_eq!(get_closest(&[-10, 10], -7), Some(-10));
    }

    #[test]
    fn test_get_closest_accepts_wide_integers() {
        assert_eq!(get_closest(&[10_i64, -3_000_000_000], -2_000_000_000), Some(-3_000_000_000));
        assert_eq!(get_closest(&[7_u64, 40], 30), Some(40));
        let sizes: Vec<usize> = vec![512, 1024, 4096];
        assert_eq!(get_closest(&sizes, 900), Some(1024));
    }

    #[test]
    fn test_get_path_walks_objects_and_lists() {
        let data = json!({"user": {"emails": ["a@x.fr", "b@x.fr"]}});
        assert_eq!(get_path(&data, "user.emails.1"), Some(&json!("b@x.fr")));
        assert_eq!(get_path(&data, "user.emails.5"), None);
        assert_eq!(get_path(&data, "user.name"), None);
        assert_eq!(get_path(&data, ""), Some(&data));
    }

    #[test]
    fn test_set_path_creates_intermediate_objects() {
        let mut data = json!({"a": 1});
        set_path(&mut data, "b.c.d", json!(true));
        set_path(&mut data, "a.x", json!("over"));
        assert_eq!(data, json!({"a": {"x": "over"}, "b": {"c": {"d": true}}}));
    }

    #[test]
    fn test_set_path_appends_to_lists() {
        let mut data = json!({"tags": ["x"]});
        set_path(&mut data, "tags.1", json!("y"));
        set_path(&mut data, "tags.0", json!("z"));
        assert_eq!(data, json!({"tags": ["z", "y"]}));
    }

    #[test]
    fn test_set_path_keys_a_list_without_losing_items() {
        let mut data = json!({"tags": ["x", "y"]});
        set_path(&mut data, "tags.label", json!("z"));
        assert_eq!(data, json!({"tags": {"0": "x", "1": "y", "label": "z"}}));

        let mut data = json!(["x"]);
        set_path(&mut data, "5", json!("far"));
        assert_eq!(data, json!({"0": "x", "5": "far"}));
    }

    #[test]
    fn test_remove_path() {
        let mut data = json!({"a": {"b": 1, "c": [1, 2, 3]}});
        assert_eq!(remove_path(&mut data, "a.b"), Some(json!(1)));
        assert_eq!(remove_path(&mut data, "a.c.1"), Some(json!(2)));
        assert_eq!(remove_path(&mut data, "a.zzz"), None);
        assert_eq!(data, json!({"a": {"c": [1, 3]}}));
    }

    /// Validates `flatten` and `unflatten` on a mixed document.
    ///
    /// Assertions:
    /// - Confirms list indices appear in the flattened keys.
    /// - Confirms empty containers survive as leaves.
    /// - Confirms `unflatten` restores the original document.
    #[test]
    fn test_flatten_and_unflatten() {
        let data = json!({
            "name": "Acme",
            "contacts": [{"email": "a@acme.fr"}, {"email": "b@acme.fr"}],
            "meta": {}
        });

        let flat = flatten(&data);
        assert_eq!(flat.get("contacts.1.email"), Some(&json!("b@acme.fr")));
        assert_eq!(flat.get("meta"), Some(&json!({})));
        assert_eq!(flat.len(), 4);

        assert_eq!(unflatten(&flat), data);
    }

    #[test]
    fn test_only_and_except() {
        let data = json!({"id": 1, "name": "n", "secret": "s"});
        let map = data.as_object().unwrap();

        assert_eq!(Value::Object(only(map, &["id", "name", "missing"])), json!({"id": 1, "name": "n"}));
        assert_eq!(Value::Object(except(map, &["secret"])), json!({"id": 1, "name": "n"}));
    }

    #[test]
    fn test_group_and_index_by() {
        let rows = vec![
            json!({"id": 1, "city": "Lyon"}),
            json!({"id": 2, "city": "Paris"}),
            json!({"id": 3, "city": "Lyon"}),
            json!({"id": 4}),
        ];

        let groups = group_by(&rows, "city");
        assert_eq!(groups["Lyon"].len(), 2);
        assert_eq!(groups[""].len(), 1);

        let index = index_by(&rows, "id");
        assert_eq!(index["3"], rows[2]);
        assert_eq!(pluck(&rows, "city"), vec![json!("Lyon"), json!("Paris"), json!("Lyon")]);
    }

    #[test]
    fn test_is_list() {
        assert!(is_list(&json!([1, 2])));
        assert!(is_list(&json!({"0": "a", "1": "b"})));
        assert!(!is_list(&json!({"1": "a"})));
        assert!(!is_list(&json!("text")));
    }

    #[test]
    fn test_remove_empty_keeps_false_and_zero() {
        let data = json!({
            "a": null, "b": "", "c": [], "d": {"e": null},
            "f": false, "g": 0, "h": ["", "x", []]
        });
        assert_eq!(remove_empty(&data), json!({"f": false, "g": 0, "h": ["x"]}));
    }

    #[test]
    fn test_chunk() {
        assert_eq!(chunk(&[1, 2, 3, 4, 5], 2), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert!(chunk(&[1, 2], 0).is_empty());
    }
}
