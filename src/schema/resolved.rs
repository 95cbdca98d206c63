//! Resolved schema: validated and flattened into the per-column rules the table layer reads.

use crate::error::ConfigError;
use crate::schema::{validate, BooleanLabels, EntitySchema, FieldType, FilterType, SelectOption};
use crate::service::{ApiRegistry, RelationSource};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Which filter editor a column gets, with its choices for select/boolean editors.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterEditor {
    pub kind: FilterType,
    pub options: Vec<SelectOption>,
    /// Relation-backed select filters accept several values.
    pub multiple: bool,
}

/// Companion resource used to resolve a relation column's option labels.
#[derive(Clone)]
pub struct RelationBinding {
    pub api: String,
    pub source: Arc<dyn RelationSource>,
    pub value_field: String,
    pub label_field: String,
    pub multiple: bool,
}

impl fmt::Debug for RelationBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationBinding")
            .field("api", &self.api)
            .field("value_field", &self.value_field)
            .field("label_field", &self.label_field)
            .field("multiple", &self.multiple)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedColumn {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub sortable: bool,
    pub filter: Option<FilterEditor>,
    /// User may toggle this column on/off.
    pub hideable: bool,
    /// Part of the default column set.
    pub visible_by_default: bool,
    pub read_only: bool,
    pub options: Vec<SelectOption>,
    pub boolean_labels: BooleanLabels,
    pub relation: Option<RelationBinding>,
}

impl ResolvedColumn {
    /// Label for a select value, if declared.
    pub fn option_label(&self, value: &Value) -> Option<&str> {
        self.options
            .iter()
            .find(|o| &o.value == value)
            .map(|o| o.label.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedSchema {
    pub entity_name: String,
    pub id_field: String,
    pub columns: Vec<ResolvedColumn>,
}

impl ResolvedSchema {
    pub fn column(&self, name: &str) -> Option<&ResolvedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn default_columns(&self) -> impl Iterator<Item = &ResolvedColumn> {
        self.columns.iter().filter(|c| c.visible_by_default)
    }

    pub fn relation_columns(&self) -> impl Iterator<Item = &ResolvedColumn> {
        self.columns.iter().filter(|c| c.relation.is_some())
    }

    /// String form of the row's id field. Numbers and strings only.
    pub fn id_of(&self, row: &Value) -> Option<String> {
        match row.get(&self.id_field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Validate, then derive column rules. Relation `api` names are bound through `registry`.
pub fn resolve(schema: &EntitySchema, registry: &ApiRegistry) -> Result<ResolvedSchema, ConfigError> {
    validate(schema, registry)?;

    let mut columns = Vec::with_capacity(schema.fields.len());
    for f in &schema.fields {
        let relation = match (&f.relation, f.field_type) {
            (Some(rel), FieldType::Relation) => {
                let source = registry.get(&rel.api).ok_or_else(|| ConfigError::MissingReference {
                    kind: "relation api",
                    id: rel.api.clone(),
                })?;
                Some(RelationBinding {
                    api: rel.api.clone(),
                    source,
                    value_field: rel.value_field.clone(),
                    label_field: rel.label_field.clone(),
                    multiple: rel.multiple,
                })
            }
            _ => None,
        };
        let boolean_labels = f.boolean_labels.clone().unwrap_or_default();
        let filter = f.filter_type.filter(|_| f.filterable).map(|kind| FilterEditor {
            kind,
            options: match kind {
                FilterType::Select => f.options.clone(),
                FilterType::Boolean => vec![
                    SelectOption::new(true, boolean_labels.true_label.clone()),
                    SelectOption::new(false, boolean_labels.false_label.clone()),
                ],
                _ => Vec::new(),
            },
            multiple: relation.as_ref().map(|r| r.multiple).unwrap_or(false),
        });
        columns.push(ResolvedColumn {
            name: f.name.clone(),
            label: f.label.clone(),
            field_type: f.field_type,
            sortable: f.sortable,
            filter,
            hideable: f.hideable,
            visible_by_default: f.visible,
            read_only: !f.editable || f.name == schema.id_field,
            options: f.options.clone(),
            boolean_labels,
            relation,
        });
    }

    Ok(ResolvedSchema {
        entity_name: schema.entity_name.clone(),
        id_field: schema.id_field.clone(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::schema::FieldSchema;
    use async_trait::async_trait;
    use serde_json::json;

    struct NoRows;

    #[async_trait]
    impl RelationSource for NoRows {
        async fn options(&self, _keyword: &str, _size: u32) -> Result<Vec<Value>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn schema() -> EntitySchema {
        EntitySchema::new(
            "user",
            "id",
            vec![
                FieldSchema::new("id", "ID", FieldType::Number).sortable(),
                FieldSchema::new("username", "Username", FieldType::Text).sortable().pinned(),
                FieldSchema::new("password", "Password", FieldType::Password).hidden(),
                FieldSchema::new("active", "Active", FieldType::Boolean)
                    .filter(FilterType::Boolean)
                    .boolean_labels("Enabled", "Disabled"),
                FieldSchema::new("createdAt", "Created", FieldType::Date)
                    .filter(FilterType::DateRange)
                    .read_only()
                    .hidden()
                    .pinned(),
                FieldSchema::new("roleIds", "Roles", FieldType::Relation)
                    .filter(FilterType::Select)
                    .relation("roles", "id", "name", true),
            ],
        )
    }

    fn registry() -> ApiRegistry {
        ApiRegistry::new().with("roles", Arc::new(NoRows))
    }

    #[test]
    fn derives_column_rules() {
        let r = resolve(&schema(), &registry()).unwrap();
        let username = r.column("username").unwrap();
        assert!(username.sortable && !username.hideable && username.filter.is_none());

        let password = r.column("password").unwrap();
        assert!(!password.visible_by_default && password.hideable);

        let created = r.column("createdAt").unwrap();
        assert!(created.read_only);
        assert_eq!(created.filter.as_ref().unwrap().kind, FilterType::DateRange);
        assert!(!created.visible_by_default && !created.hideable);

        let active = r.column("active").unwrap();
        let editor = active.filter.as_ref().unwrap();
        assert_eq!(editor.options[0], SelectOption::new(true, "Enabled"));

        let roles = r.column("roleIds").unwrap();
        let rel = roles.relation.as_ref().unwrap();
        assert!(rel.multiple && roles.filter.as_ref().unwrap().multiple);
        assert_eq!(rel.label_field, "name");
    }

    #[test]
    fn id_column_is_always_read_only() {
        let r = resolve(&schema(), &registry()).unwrap();
        assert!(r.column("id").unwrap().read_only);
        assert!(!r.column("username").unwrap().read_only);
    }

    #[test]
    fn default_columns_skip_hidden() {
        let r = resolve(&schema(), &registry()).unwrap();
        let names: Vec<_> = r.default_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "username", "active", "roleIds"]);
    }

    #[test]
    fn unregistered_relation_fails_fast() {
        assert!(resolve(&schema(), &ApiRegistry::new()).is_err());
    }

    #[test]
    fn id_of_reads_numbers_and_strings() {
        let r = resolve(&schema(), &registry()).unwrap();
        assert_eq!(r.id_of(&json!({"id": 7})), Some("7".to_string()));
        assert_eq!(r.id_of(&json!({"id": "u-1"})), Some("u-1".to_string()));
        assert_eq!(r.id_of(&json!({"id": null})), None);
    }
}
