//! Collection CRUD handlers: list, read, create, replace, delete.

use super::query::{ListQuery, Row};
use super::{BackendError, Collection, IdKind, ListShape, MemoryBackend};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

const DEFAULT_SIZE: u32 = 20;

pub(crate) fn next_id(coll: &mut Collection) -> Value {
    match coll.config.id_kind {
        IdKind::Sequence => {
            let n = coll.next_id.max(1);
            coll.next_id = n + 1;
            json!(n)
        }
        IdKind::Uuid => Value::String(uuid::Uuid::new_v4().to_string()),
    }
}

fn body_to_row(value: Value) -> Result<Row, BackendError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(BackendError::BadRequest("body must be a JSON object".into())),
    }
}

fn check(coll: &Collection) -> Result<(), BackendError> {
    match coll.fail_with {
        Some(status) => Err(BackendError::Injected(status)),
        None => Ok(()),
    }
}

fn now() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339())
}

pub async fn list(
    State(backend): State<MemoryBackend>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, BackendError> {
    let guard = backend.read();
    let coll = guard
        .get(&collection)
        .ok_or_else(|| BackendError::NotFound(collection.clone()))?;
    check(coll)?;

    let q = ListQuery::from_params(params);
    let mut rows: Vec<Row> = coll.rows.iter().filter(|r| q.matches(r)).cloned().collect();
    q.sort_rows(&mut rows);

    if coll.config.shape == ListShape::BareArray {
        return Ok(Json(Value::Array(rows.into_iter().map(Value::Object).collect())));
    }

    let size = q.size.unwrap_or(DEFAULT_SIZE);
    let total = rows.len() as u64;
    let total_pages = total.div_ceil(size as u64) as u32;
    let start = (q.page as usize).saturating_mul(size as usize).min(rows.len());
    let end = start.saturating_add(size as usize).min(rows.len());
    let items: Vec<Value> = rows[start..end].iter().cloned().map(Value::Object).collect();
    let key = match coll.config.shape {
        ListShape::Content => "content",
        _ => "items",
    };
    Ok(Json(json!({
        key: items,
        "page": q.page,
        "size": size,
        "totalPages": total_pages,
        "totalElements": total,
        "hasNext": q.page.saturating_add(1) < total_pages,
        "hasPrevious": q.page > 0,
    })))
}

pub async fn read(
    State(backend): State<MemoryBackend>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, BackendError> {
    let guard = backend.read();
    let coll = guard
        .get(&collection)
        .ok_or_else(|| BackendError::NotFound(collection.clone()))?;
    check(coll)?;
    let idx = coll.position(&id).ok_or(BackendError::NotFound(id))?;
    Ok(Json(Value::Object(coll.rows[idx].clone())))
}

pub async fn create(
    State(backend): State<MemoryBackend>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, BackendError> {
    let mut row = body_to_row(body)?;
    let mut guard = backend.write();
    let coll = guard
        .get_mut(&collection)
        .ok_or_else(|| BackendError::NotFound(collection.clone()))?;
    check(coll)?;
    let id = next_id(coll);
    row.insert(coll.config.id_field.clone(), id);
    let ts = now();
    row.insert("createdAt".into(), ts.clone());
    row.insert("updatedAt".into(), ts);
    coll.rows.push(row.clone());
    tracing::debug!(%collection, "row created");
    Ok((StatusCode::CREATED, Json(Value::Object(row))))
}

/// Full replace; id and createdAt are server-owned.
pub async fn replace(
    State(backend): State<MemoryBackend>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, BackendError> {
    let mut row = body_to_row(body)?;
    let mut guard = backend.write();
    let coll = guard
        .get_mut(&collection)
        .ok_or_else(|| BackendError::NotFound(collection.clone()))?;
    check(coll)?;
    let idx = coll.position(&id).ok_or(BackendError::NotFound(id))?;
    let id_field = coll.config.id_field.clone();
    let existing = &coll.rows[idx];
    if let Some(v) = existing.get(&id_field) {
        row.insert(id_field, v.clone());
    }
    if let Some(v) = existing.get("createdAt") {
        row.insert("createdAt".into(), v.clone());
    }
    row.insert("updatedAt".into(), now());
    coll.rows[idx] = row.clone();
    Ok(Json(Value::Object(row)))
}

pub async fn delete(
    State(backend): State<MemoryBackend>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, BackendError> {
    let mut guard = backend.write();
    let coll = guard
        .get_mut(&collection)
        .ok_or_else(|| BackendError::NotFound(collection.clone()))?;
    check(coll)?;
    let idx = coll.position(&id).ok_or(BackendError::NotFound(id))?;
    coll.rows.remove(idx);
    Ok(StatusCode::NO_CONTENT)
}
