//! Table schemas for the platform resources.

use crate::schema::{EntitySchema, FieldSchema, FieldType, FilterType, SelectOption};

pub fn users() -> EntitySchema {
    EntitySchema::new(
        "user",
        "id",
        vec![
            FieldSchema::new("id", "ID", FieldType::Number).sortable().pinned(),
            FieldSchema::new("username", "Username", FieldType::Text)
                .sortable()
                .filter(FilterType::Text)
                .pinned(),
            FieldSchema::new("fullName", "Full name", FieldType::Text).sortable(),
            FieldSchema::new("email", "Email", FieldType::Text).sortable().filter(FilterType::Text),
            FieldSchema::new("password", "Password", FieldType::Password).hidden().pinned(),
            FieldSchema::new("departmentId", "Department", FieldType::Relation)
                .filter(FilterType::Select)
                .relation("departments", "id", "name", false),
            FieldSchema::new("roleIds", "Roles", FieldType::Relation)
                .filter(FilterType::Select)
                .relation("roles", "id", "name", true),
            FieldSchema::new("active", "Status", FieldType::Boolean)
                .filter(FilterType::Boolean)
                .boolean_labels("Active", "Locked"),
            FieldSchema::new("createdAt", "Created", FieldType::Date)
                .sortable()
                .filter(FilterType::DateRange)
                .read_only()
                .hidden(),
        ],
    )
}

pub fn roles() -> EntitySchema {
    EntitySchema::new(
        "role",
        "id",
        vec![
            FieldSchema::new("id", "ID", FieldType::Number).sortable(),
            FieldSchema::new("name", "Name", FieldType::Text).sortable().filter(FilterType::Text).pinned(),
            FieldSchema::new("description", "Description", FieldType::Text),
            FieldSchema::new("permissionIds", "Permissions", FieldType::Relation)
                .relation("permissions", "id", "code", true),
        ],
    )
}

pub fn permissions() -> EntitySchema {
    EntitySchema::new(
        "permission",
        "id",
        vec![
            FieldSchema::new("id", "ID", FieldType::Number).sortable(),
            FieldSchema::new("code", "Code", FieldType::Text).sortable().filter(FilterType::Text).pinned(),
            FieldSchema::new("description", "Description", FieldType::Text),
        ],
    )
}

pub fn departments() -> EntitySchema {
    EntitySchema::new(
        "department",
        "id",
        vec![
            FieldSchema::new("id", "ID", FieldType::Number).sortable(),
            FieldSchema::new("name", "Name", FieldType::Text).sortable().filter(FilterType::Text).pinned(),
            FieldSchema::new("location", "Location", FieldType::Text).filter(FilterType::Text),
            FieldSchema::new("active", "Active", FieldType::Boolean).filter(FilterType::Boolean),
        ],
    )
}

pub fn courses() -> EntitySchema {
    EntitySchema::new(
        "course",
        "id",
        vec![
            FieldSchema::new("id", "ID", FieldType::Number).sortable(),
            FieldSchema::new("code", "Code", FieldType::Text).sortable().filter(FilterType::Text),
            FieldSchema::new("title", "Title", FieldType::Text).sortable().filter(FilterType::Text).pinned(),
            FieldSchema::new("level", "Level", FieldType::Select)
                .filter(FilterType::Select)
                .options(vec![
                    SelectOption::new("BEGINNER", "Beginner"),
                    SelectOption::new("INTERMEDIATE", "Intermediate"),
                    SelectOption::new("ADVANCED", "Advanced"),
                ]),
            FieldSchema::new("departmentId", "Department", FieldType::Relation)
                .filter(FilterType::Select)
                .relation("departments", "id", "name", false),
            FieldSchema::new("durationHours", "Hours", FieldType::Number)
                .sortable()
                .filter(FilterType::NumberRange),
            FieldSchema::new("published", "Published", FieldType::Boolean).filter(FilterType::Boolean),
            FieldSchema::new("createdAt", "Created", FieldType::Date).read_only().hidden(),
        ],
    )
}
