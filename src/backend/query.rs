//! List query evaluation for the in-memory backend: keyword, filters, sort, paging.

use crate::codec::{value_to_key, SortDirection};
use serde_json::{Map, Value};
use std::cmp::Ordering;

pub type Row = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListQuery {
    pub keyword: Option<String>,
    pub page: u32,
    pub size: Option<u32>,
    pub sort: Vec<(String, SortDirection)>,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn from_params(params: Vec<(String, String)>) -> Self {
        let mut q = ListQuery::default();
        for (k, v) in params {
            match k.as_str() {
                "keyword" => {
                    let v = v.trim();
                    if !v.is_empty() {
                        q.keyword = Some(v.to_lowercase());
                    }
                }
                "page" => q.page = v.parse().unwrap_or(0),
                "size" => q.size = v.parse().ok().filter(|n| *n > 0),
                "sort" => {
                    let mut parts = v.splitn(2, ',');
                    let field = parts.next().unwrap_or_default().trim().to_string();
                    let dir = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
                        Some(d) if d == "desc" => SortDirection::Desc,
                        _ => SortDirection::Asc,
                    };
                    if !field.is_empty() {
                        q.sort.push((field, dir));
                    }
                }
                _ => q.filters.push((k, v)),
            }
        }
        q
    }

    pub fn matches(&self, row: &Row) -> bool {
        if let Some(kw) = &self.keyword {
            let hit = row
                .values()
                .any(|v| v.as_str().map(|s| s.to_lowercase().contains(kw.as_str())).unwrap_or(false));
            if !hit {
                return false;
            }
        }
        self.filters.iter().all(|(k, v)| filter_matches(row, k, v))
    }

    pub fn sort_rows(&self, rows: &mut [Row]) {
        if self.sort.is_empty() {
            return;
        }
        rows.sort_by(|a, b| {
            for (field, dir) in &self.sort {
                let ord = compare_values(a.get(field), b.get(field));
                let ord = match dir {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }
}

/// `key=v` exact (or any-of for `a,b`, or membership when the cell is an array);
/// `key.from` / `key.to` inclusive range.
fn filter_matches(row: &Row, key: &str, expected: &str) -> bool {
    if let Some(field) = key.strip_suffix(".from") {
        return row
            .get(field)
            .map(|v| compare_to_str(v, expected) != Ordering::Less)
            .unwrap_or(false);
    }
    if let Some(field) = key.strip_suffix(".to") {
        return row
            .get(field)
            .map(|v| compare_to_str(v, expected) != Ordering::Greater)
            .unwrap_or(false);
    }
    let Some(cell) = row.get(key) else {
        return false;
    };
    let wanted: Vec<&str> = expected.split(',').map(str::trim).collect();
    match cell {
        Value::Array(items) => items.iter().any(|i| wanted.contains(&value_to_key(i).as_str())),
        other => wanted.contains(&value_to_key(other).as_str()),
    }
}

fn compare_to_str(v: &Value, s: &str) -> Ordering {
    match (v.as_f64(), s.parse::<f64>().ok()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => value_to_key(v).as_str().cmp(s),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => value_to_key(a).cmp(&value_to_key(b)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    fn params(p: &[(&str, &str)]) -> Vec<(String, String)> {
        p.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn parses_reserved_and_filter_params() {
        let q = ListQuery::from_params(params(&[
            ("keyword", " Ann "),
            ("page", "2"),
            ("size", "5"),
            ("sort", "name,desc"),
            ("sort", "id"),
            ("departmentId", "3"),
        ]));
        assert_eq!(q.keyword.as_deref(), Some("ann"));
        assert_eq!((q.page, q.size), (2, Some(5)));
        assert_eq!(q.sort, vec![("name".into(), SortDirection::Desc), ("id".into(), SortDirection::Asc)]);
        assert_eq!(q.filters, params(&[("departmentId", "3")]));
    }

    #[test]
    fn filters_and_keyword() {
        let r = row(json!({"id": 1, "name": "Ann Lee", "roleIds": [1, 2], "age": 30, "active": true}));
        let q = |p: &[(&str, &str)]| ListQuery::from_params(params(p)).matches(&r);
        assert!(q(&[("keyword", "lee")]));
        assert!(!q(&[("keyword", "bob")]));
        assert!(q(&[("roleIds", "2")]));
        assert!(q(&[("id", "5,1")]));
        assert!(q(&[("active", "true")]));
        assert!(q(&[("age.from", "18"), ("age.to", "30")]));
        assert!(!q(&[("age.from", "31")]));
        assert!(!q(&[("missing", "x")]));
    }

    #[test]
    fn multi_key_sort() {
        let mut rows = vec![
            row(json!({"id": 1, "dept": "b"})),
            row(json!({"id": 2, "dept": "a"})),
            row(json!({"id": 3, "dept": "b"})),
            row(json!({"id": 4})),
        ];
        ListQuery::from_params(params(&[("sort", "dept,asc"), ("sort", "id,desc")])).sort_rows(&mut rows);
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }
}
