//! Page envelope: canonical `PageResponse` plus normalisation of the wire shapes the backend returns.
//!
//! Three shapes are accepted: `{ items, ... }`, the legacy `{ content, ... }`, and a bare array.

use crate::codec::json_type_name;
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PageResponse<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            size: 0,
            total_pages: 0,
            total_elements: 0,
            has_next: false,
            has_previous: false,
        }
    }

    /// Treat a full list as one page.
    pub fn single(items: Vec<T>) -> Self {
        let n = items.len();
        Self {
            items,
            page: 0,
            size: n as u32,
            total_pages: 1,
            total_elements: n as u64,
            has_next: false,
            has_previous: false,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

/// Normalise any accepted wire shape into an object carrying both `items` and `content`
/// plus complete pagination metadata. Metadata present on the wire is relayed untouched.
pub fn normalize(body: Value) -> Result<Value, ApiError> {
    match body {
        Value::Array(items) => {
            let n = items.len();
            Ok(json!({
                "content": items.clone(),
                "items": items,
                "page": 0,
                "size": n,
                "totalPages": 1,
                "totalElements": n,
                "hasNext": false,
                "hasPrevious": false,
            }))
        }
        Value::Object(obj) => normalize_object(obj).map(Value::Object),
        other => Err(ApiError::Validation(format!(
            "page envelope must be an object or array, got {}",
            json_type_name(&other)
        ))),
    }
}

fn normalize_object(mut obj: Map<String, Value>) -> Result<Map<String, Value>, ApiError> {
    let items = match (obj.get("items"), obj.get("content")) {
        (Some(Value::Array(i)), _) => i.clone(),
        (_, Some(Value::Array(c))) => c.clone(),
        (None, None) => {
            return Err(ApiError::Validation(
                "page envelope has neither items nor content".into(),
            ))
        }
        _ => {
            return Err(ApiError::Validation(
                "page envelope items/content must be an array".into(),
            ))
        }
    };
    let n = items.len() as u64;
    obj.insert("items".into(), Value::Array(items.clone()));
    obj.insert("content".into(), Value::Array(items));

    let page = obj.get("page").and_then(Value::as_u64).unwrap_or(0);
    default_meta(&mut obj, "page", json!(page));
    default_meta(&mut obj, "size", json!(n));
    default_meta(&mut obj, "totalElements", json!(n));
    default_meta(&mut obj, "totalPages", json!(1));
    default_meta(&mut obj, "hasNext", json!(false));
    default_meta(&mut obj, "hasPrevious", json!(page > 0));
    Ok(obj)
}

/// Missing and `null` metadata both take the default.
fn default_meta(obj: &mut Map<String, Value>, key: &str, default: Value) {
    let slot = obj.entry(key).or_insert(Value::Null);
    if slot.is_null() {
        *slot = default;
    }
}

/// Decode a list response body into the canonical page type.
pub fn decode_page<T: DeserializeOwned>(body: Value) -> Result<PageResponse<T>, ApiError> {
    let normalized = normalize(body)?;
    Ok(serde_json::from_value(normalized)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_mirrored_onto_items() {
        let out = normalize(json!({ "content": [{ "id": 1 }] })).unwrap();
        assert_eq!(out["content"], json!([{ "id": 1 }]));
        assert_eq!(out["items"], json!([{ "id": 1 }]));
    }

    #[test]
    fn items_are_mirrored_onto_content() {
        let out = normalize(json!({ "items": [{ "id": 9 }], "page": 2, "size": 1, "totalPages": 5, "totalElements": 5, "hasNext": true, "hasPrevious": true })).unwrap();
        assert_eq!(out["content"], json!([{ "id": 9 }]));
        assert_eq!(out["totalPages"], json!(5));
        assert_eq!(out["hasNext"], json!(true));
    }

    #[test]
    fn bare_array_becomes_single_page() {
        let out = normalize(json!([{ "id": 1 }, { "id": 2 }])).unwrap();
        assert_eq!(
            out,
            json!({
                "content": [{ "id": 1 }, { "id": 2 }],
                "items": [{ "id": 1 }, { "id": 2 }],
                "page": 0,
                "size": 2,
                "totalPages": 1,
                "totalElements": 2,
                "hasNext": false,
                "hasPrevious": false,
            })
        );
    }

    #[test]
    fn server_metadata_is_relayed_not_recomputed() {
        // hasNext disagrees with page/totalPages on purpose; the client relays it.
        let page: PageResponse<Value> = decode_page(json!({
            "items": [], "page": 0, "size": 20, "totalPages": 1, "totalElements": 0, "hasNext": true, "hasPrevious": false
        }))
        .unwrap();
        assert!(page.has_next);
    }

    #[test]
    fn null_metadata_takes_defaults() {
        let page: PageResponse<Value> = decode_page(json!({
            "content": [1, 2], "page": 3, "size": null, "totalPages": null,
            "totalElements": null, "hasNext": null, "hasPrevious": null
        }))
        .unwrap();
        assert_eq!(page.page, 3);
        assert_eq!((page.size, page.total_pages, page.total_elements), (2, 1, 2));
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn rejects_scalar_and_missing_items() {
        assert!(normalize(json!("nope")).is_err());
        assert!(normalize(json!({ "page": 0 })).is_err());
        assert!(normalize(json!({ "items": 3 })).is_err());
    }

    #[test]
    fn decodes_typed_items() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Row {
            id: u32,
        }
        let page: PageResponse<Row> = decode_page(json!([{ "id": 4 }])).unwrap();
        assert_eq!(page.items, vec![Row { id: 4 }]);
        assert_eq!(page.total_pages, 1);
    }
}
