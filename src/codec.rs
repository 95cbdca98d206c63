//! Pagination, sort and filter values and their query-string form.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

impl SortEntry {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction: Some(direction),
        }
    }

    /// Wire form `field,direction`.
    pub fn to_param(&self) -> String {
        format!("{},{}", self.field, self.direction.unwrap_or_default())
    }
}

/// Page request. `sort` order is significant: first entry is the primary key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRequest {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub sort: Vec<SortEntry>,
}

impl PaginationRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortEntry>) -> Self {
        self.sort = sort;
        self
    }
}

/// Flat, ordered query parameters. Keys may repeat (`sort`).
pub type QueryParams = Vec<(String, String)>;

/// Serialize pagination into query parameters. Absent pagination yields no parameters.
pub fn build_page_params(pagination: Option<&PaginationRequest>) -> QueryParams {
    let Some(p) = pagination else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(2 + p.sort.len());
    out.push(("page".to_string(), p.page.unwrap_or(DEFAULT_PAGE).to_string()));
    out.push(("size".to_string(), p.size.unwrap_or(DEFAULT_PAGE_SIZE).to_string()));
    for s in &p.sort {
        out.push(("sort".to_string(), s.to_param()));
    }
    out
}

/// Open mapping from filter field to value. Empty values are never stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(BTreeMap<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any serializable filter struct. `None`/empty members are dropped.
    pub fn from_serialize<F: Serialize>(filter: &F) -> Result<Self, ApiError> {
        match serde_json::to_value(filter)? {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Ok(Self::new()),
            other => Err(ApiError::Validation(format!(
                "filter must serialize to an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut f = Self::new();
        for (k, v) in map {
            f.set(k, v);
        }
        f
    }

    /// Set a value; an empty value removes the key instead.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if is_empty_value(&value) {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Merge another filter on top of this one; keys in `other` win.
    pub fn merged(&self, other: &Filter) -> Filter {
        let mut out = self.clone();
        for (k, v) in other.iter() {
            out.0.insert(k.clone(), v.clone());
        }
        out
    }
}

/// `null`, blank strings, empty arrays and objects whose members are all empty.
pub fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.iter().all(is_empty_value),
        Value::Object(o) => o.values().all(is_empty_value),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn scalar_param(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Flatten a filter into query parameters.
///
/// Arrays become comma-joined lists, objects (range editors) become `key.member` pairs.
pub fn filter_params(filter: &Filter) -> QueryParams {
    let mut out = Vec::new();
    for (k, v) in filter.iter() {
        match v {
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter(|i| !is_empty_value(i))
                    .filter_map(scalar_param)
                    .collect::<Vec<_>>()
                    .join(",");
                if !joined.is_empty() {
                    out.push((k.clone(), joined));
                }
            }
            Value::Object(members) => {
                for (sub, sv) in members {
                    if is_empty_value(sv) {
                        continue;
                    }
                    if let Some(s) = scalar_param(sv) {
                        out.push((format!("{}.{}", k, sub), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar_param(other) {
                    out.push((k.clone(), s));
                }
            }
        }
    }
    out
}

/// Full search query: keyword (omitted when blank), pagination, then filters.
pub fn search_params(keyword: &str, pagination: Option<&PaginationRequest>, filter: &Filter) -> QueryParams {
    let mut out = Vec::new();
    let keyword = keyword.trim();
    if !keyword.is_empty() {
        out.push(("keyword".to_string(), keyword.to_string()));
    }
    out.extend(build_page_params(pagination));
    out.extend(filter_params(filter));
    out
}

/// String form used to match ids and option values: strings as-is, everything else as JSON text.
pub fn value_to_key(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(p: &[(&str, &str)]) -> QueryParams {
        p.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn absent_pagination_is_empty() {
        assert!(build_page_params(None).is_empty());
    }

    #[test]
    fn defaults_page_and_size() {
        let p = PaginationRequest::default();
        assert_eq!(build_page_params(Some(&p)), pairs(&[("page", "0"), ("size", "20")]));
    }

    #[test]
    fn sort_keeps_order_and_defaults_to_asc() {
        let p = PaginationRequest::new(3, 50).with_sort(vec![
            SortEntry { field: "name".into(), direction: None },
            SortEntry::new("createdAt", SortDirection::Desc),
        ]);
        assert_eq!(
            build_page_params(Some(&p)),
            pairs(&[("page", "3"), ("size", "50"), ("sort", "name,asc"), ("sort", "createdAt,desc")])
        );
    }

    #[test]
    fn filter_drops_empty_values() {
        let mut f = Filter::new();
        f.set("status", "ACTIVE");
        f.set("email", "");
        f.set("roleIds", json!([]));
        f.set("name", Value::Null);
        assert_eq!(f.len(), 1);
        f.set("status", "   ");
        assert!(f.is_empty());
    }

    #[test]
    fn filter_params_flatten_arrays_and_ranges() {
        let f = Filter::new()
            .with("active", true)
            .with("roleIds", json!([1, 2, ""]))
            .with("createdAt", json!({"from": "2024-01-01", "to": ""}));
        assert_eq!(
            filter_params(&f),
            pairs(&[("active", "true"), ("createdAt.from", "2024-01-01"), ("roleIds", "1,2")])
        );
    }

    #[test]
    fn typed_filter_from_serialize() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct UserFilter {
            department_id: Option<i64>,
            status: Option<String>,
        }
        let f = Filter::from_serialize(&UserFilter { department_id: Some(7), status: None }).unwrap();
        assert_eq!(f.get("departmentId"), Some(&json!(7)));
        assert!(f.get("status").is_none());
        assert!(Filter::from_serialize(&vec![1, 2]).is_err());
    }

    #[test]
    fn value_keys_keep_strings_bare() {
        assert_eq!(value_to_key(&json!("7")), "7");
        assert_eq!(value_to_key(&json!(7)), "7");
        assert_eq!(value_to_key(&json!(true)), "true");
    }

    #[test]
    fn search_params_omit_blank_keyword() {
        let q = search_params("  ", None, &Filter::new());
        assert!(q.is_empty());
        let q = search_params("ann", Some(&PaginationRequest::new(0, 10)), &Filter::new().with("x", 1));
        assert_eq!(q, pairs(&[("keyword", "ann"), ("page", "0"), ("size", "10"), ("x", "1")]));
    }
}
