//! Multi-key row sorting
//!
//! A [`MultiSorter`] owns an ordered list of [`SortCriterion`]s. Rows are
//! compared on the first criterion; ties fall through to the next one until
//! a difference is found or the list is exhausted. The sort is stable, so
//! rows equal on every criterion keep their input order.
//!
//! Values of different kinds are ranked `null < bool < number < string <
//! list < object`. A missing key counts as `null`.
//!
//! ```
//! use helpkit_common::arr::{MultiSorter, SortCriterion};
//! use serde_json::json;
//!
//! let mut rows = vec![
//!     json!({"city": "Lyon", "name": "b"}),
//!     json!({"city": "Paris", "name": "a"}),
//!     json!({"city": "Lyon", "name": "a"}),
//! ];
//! MultiSorter::new(vec![SortCriterion::asc("city"), SortCriterion::desc("name")]).sort(&mut rows);
//!
//! assert_eq!(rows[0], json!({"city": "Lyon", "name": "b"}));
//! assert_eq!(rows[2], json!({"city": "Paris", "name": "a"}));
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::get_path;
use super::natural::{natural_cmp, natural_cmp_ci};

/// One sort key with its direction and string comparison mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    /// Dot path of the value to compare
    pub key: String,
    #[serde(default = "default_true")]
    pub ascending: bool,
    /// Compare strings in natural order (`"a2" < "a10"`)
    #[serde(default)]
    pub natural: bool,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

fn default_true() -> bool {
    true
}

impl SortCriterion {
    pub fn asc(key: impl Into<String>) -> Self {
        Self { key: key.into(), ascending: true, natural: false, case_sensitive: true }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self { ascending: false, ..Self::asc(key) }
    }

    pub fn natural(mut self) -> Self {
        self.natural = true;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

/// Comparator carrying its criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSorter {
    criteria: Vec<SortCriterion>,
}

impl MultiSorter {
    pub fn new(criteria: Vec<SortCriterion>) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    /// Compare two rows on every criterion in turn
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self.compare_from(a, b, 0)
    }

    fn compare_from(&self, a: &Value, b: &Value, depth: usize) -> Ordering {
        let Some(criterion) = self.criteria.get(depth) else {
            return Ordering::Equal;
        };

        let ord = compare_values(get_path(a, &criterion.key), get_path(b, &criterion.key), criterion);
        match ord {
            Ordering::Equal => self.compare_from(a, b, depth + 1),
            _ if criterion.ascending => ord,
            _ => ord.reverse(),
        }
    }

    /// Stable in-place sort
    pub fn sort(&self, rows: &mut [Value]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }

    /// Sort rows, then every nested list found under `children_key`
    pub fn sort_recursive(&self, rows: &mut [Value], children_key: &str) {
        self.sort(rows);
        for row in rows.iter_mut() {
            if let Some(Value::Array(children)) = row.get_mut(children_key) {
                self.sort_recursive(children, children_key);
            }
        }
    }
}

/// Sort rows by the given criteria
pub fn sort_by_criteria(rows: &mut [Value], criteria: Vec<SortCriterion>) {
    MultiSorter::new(criteria).sort(rows);
}

/// Sort rows and their nested `children_key` lists by the given criteria
pub fn sort_recursive(rows: &mut [Value], criteria: Vec<SortCriterion>, children_key: &str) {
    MultiSorter::new(criteria).sort_recursive(rows, children_key);
}

fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>, criterion: &SortCriterion) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => compare_strings(x, y, criterion),
        (Some(Value::Array(x)), Some(Value::Array(y))) => x.len().cmp(&y.len()),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn compare_strings(a: &str, b: &str, criterion: &SortCriterion) -> Ordering {
    match (criterion.natural, criterion.case_sensitive) {
        (true, true) => natural_cmp(a, b),
        (true, false) => natural_cmp_ci(a, b),
        (false, true) => a.cmp(b),
        (false, false) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}
