//! Demo data for the in-memory backend. Permissions answer with a bare array and
//! departments with the legacy `content` envelope, like the real backend does.

use crate::backend::{BackendError, CollectionConfig, ListShape, MemoryBackend};
use serde_json::json;

pub fn demo_backend() -> Result<MemoryBackend, BackendError> {
    let backend = MemoryBackend::new()
        .with_collection("users", CollectionConfig::default())
        .with_collection("roles", CollectionConfig::default())
        .with_collection(
            "permissions",
            CollectionConfig {
                shape: ListShape::BareArray,
                ..CollectionConfig::default()
            },
        )
        .with_collection(
            "departments",
            CollectionConfig {
                shape: ListShape::Content,
                ..CollectionConfig::default()
            },
        )
        .with_collection("courses", CollectionConfig::default());

    backend.seed(
        "permissions",
        vec![
            json!({"id": 1, "code": "USER_READ", "description": "View users"}),
            json!({"id": 2, "code": "USER_WRITE", "description": "Manage users"}),
            json!({"id": 3, "code": "COURSE_WRITE", "description": "Manage courses"}),
        ],
    )?;
    backend.seed(
        "roles",
        vec![
            json!({"id": 1, "name": "Administrator", "permissionIds": [1, 2, 3]}),
            json!({"id": 2, "name": "Trainer", "permissionIds": [1, 3]}),
            json!({"id": 3, "name": "Trainee", "permissionIds": []}),
        ],
    )?;
    backend.seed(
        "departments",
        vec![
            json!({"id": 1, "name": "Engineering", "location": "Hanoi", "active": true}),
            json!({"id": 2, "name": "Training", "location": "Da Nang", "active": true}),
            json!({"id": 3, "name": "Archive", "location": null, "active": false}),
        ],
    )?;
    backend.seed(
        "users",
        vec![
            json!({"id": 1, "username": "admin", "email": "admin@example.org", "fullName": "Site Admin", "departmentId": 1, "roleIds": [1], "active": true, "createdAt": "2024-01-05T08:00:00Z"}),
            json!({"id": 2, "username": "tran", "email": "tran@example.org", "fullName": "Tran Minh", "departmentId": 2, "roleIds": [2], "active": true, "createdAt": "2024-02-11T09:30:00Z"}),
            json!({"id": 3, "username": "linh", "email": "linh@example.org", "fullName": "Linh Pham", "departmentId": 2, "roleIds": [3], "active": true, "createdAt": "2024-03-02T10:15:00Z"}),
            json!({"id": 4, "username": "quang", "email": "quang@example.org", "fullName": "Quang Do", "departmentId": 1, "roleIds": [2, 3], "active": false, "createdAt": "2024-03-20T14:45:00Z"}),
            json!({"id": 5, "username": "mai", "email": "mai@example.org", "fullName": "Mai Vu", "departmentId": 3, "roleIds": [3], "active": true, "createdAt": "2024-04-01T07:00:00Z"}),
        ],
    )?;
    backend.seed(
        "courses",
        vec![
            json!({"id": 1, "code": "RS-101", "title": "Rust Foundations", "level": "BEGINNER", "departmentId": 1, "published": true, "durationHours": 16}),
            json!({"id": 2, "code": "SEC-201", "title": "Access Control Basics", "level": "INTERMEDIATE", "departmentId": 2, "published": true, "durationHours": 8}),
            json!({"id": 3, "code": "OPS-301", "title": "Incident Response", "level": "ADVANCED", "departmentId": 1, "published": false, "durationHours": 24}),
        ],
    )?;
    Ok(backend)
}
