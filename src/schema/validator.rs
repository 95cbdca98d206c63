//! Schema validation: field integrity and relation bindings.

use crate::error::ConfigError;
use crate::schema::{EntitySchema, FieldType, FilterType};
use crate::service::ApiRegistry;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn field_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("field name pattern compiles"))
}

fn invalid(schema: &EntitySchema, msg: String) -> ConfigError {
    ConfigError::InvalidSchema(format!("{}: {}", schema.entity_name, msg))
}

pub fn validate(schema: &EntitySchema, registry: &ApiRegistry) -> Result<(), ConfigError> {
    if schema.entity_name.trim().is_empty() {
        return Err(ConfigError::InvalidSchema("entity name is required".into()));
    }
    if schema.fields.is_empty() {
        return Err(invalid(schema, "at least one field required".into()));
    }

    let mut names = HashSet::new();
    for f in &schema.fields {
        if !field_name_re().is_match(&f.name) {
            return Err(invalid(schema, format!("invalid field name '{}'", f.name)));
        }
        if !names.insert(f.name.as_str()) {
            return Err(invalid(schema, format!("duplicate field '{}'", f.name)));
        }
    }
    if !names.contains(schema.id_field.as_str()) {
        return Err(ConfigError::MissingReference {
            kind: "id field",
            id: format!("{}.{}", schema.entity_name, schema.id_field),
        });
    }

    for f in &schema.fields {
        if f.filterable && f.filter_type.is_none() {
            return Err(invalid(schema, format!("field '{}' is filterable but has no filter type", f.name)));
        }
        if f.field_type == FieldType::Relation {
            let rel = f
                .relation
                .as_ref()
                .ok_or_else(|| invalid(schema, format!("relation field '{}' has no relation config", f.name)))?;
            if rel.api.trim().is_empty() {
                return Err(invalid(schema, format!("relation field '{}' has no api", f.name)));
            }
            if rel.value_field.trim().is_empty() || rel.label_field.trim().is_empty() {
                return Err(invalid(
                    schema,
                    format!("relation field '{}' needs valueField and labelField", f.name),
                ));
            }
            if !registry.contains(&rel.api) {
                return Err(ConfigError::MissingReference {
                    kind: "relation api",
                    id: rel.api.clone(),
                });
            }
        } else if f.filter_type == Some(FilterType::Select) && f.options.is_empty() {
            return Err(invalid(schema, format!("select filter on '{}' has no options", f.name)));
        }
        if f.field_type == FieldType::Select && f.options.is_empty() {
            return Err(invalid(schema, format!("select field '{}' has no options", f.name)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSchema, SelectOption};

    fn base() -> EntitySchema {
        EntitySchema::new(
            "user",
            "id",
            vec![
                FieldSchema::new("id", "ID", FieldType::Number).read_only(),
                FieldSchema::new("name", "Name", FieldType::Text).sortable().filter(FilterType::Text),
            ],
        )
    }

    #[test]
    fn accepts_well_formed_schema() {
        assert!(validate(&base(), &ApiRegistry::new()).is_ok());
    }

    #[test]
    fn id_field_must_be_declared() {
        let mut s = base();
        s.id_field = "uuid".into();
        assert!(matches!(
            validate(&s, &ApiRegistry::new()),
            Err(ConfigError::MissingReference { kind: "id field", .. })
        ));
    }

    #[test]
    fn filterable_requires_filter_type() {
        let mut s = base();
        s.fields[1].filter_type = None;
        assert!(validate(&s, &ApiRegistry::new()).is_err());
    }

    #[test]
    fn duplicate_and_malformed_names_rejected() {
        let mut s = base();
        s.fields.push(FieldSchema::new("name", "Again", FieldType::Text));
        assert!(validate(&s, &ApiRegistry::new()).is_err());
        let mut s = base();
        s.fields.push(FieldSchema::new("bad name", "Bad", FieldType::Text));
        assert!(validate(&s, &ApiRegistry::new()).is_err());
    }

    #[test]
    fn relation_requires_config_and_registered_api() {
        let mut s = base();
        s.fields.push(FieldSchema::new("roleIds", "Roles", FieldType::Relation));
        assert!(matches!(validate(&s, &ApiRegistry::new()), Err(ConfigError::InvalidSchema(_))));

        let mut s = base();
        s.fields
            .push(FieldSchema::new("roleIds", "Roles", FieldType::Relation).relation("roles", "id", "name", true));
        assert!(matches!(
            validate(&s, &ApiRegistry::new()),
            Err(ConfigError::MissingReference { kind: "relation api", .. })
        ));
    }

    #[test]
    fn select_needs_options() {
        let mut s = base();
        s.fields.push(FieldSchema::new("status", "Status", FieldType::Select));
        assert!(validate(&s, &ApiRegistry::new()).is_err());
        let mut s = base();
        s.fields.push(
            FieldSchema::new("status", "Status", FieldType::Select)
                .filter(FilterType::Select)
                .options(vec![SelectOption::new("ACTIVE", "Active")]),
        );
        assert!(validate(&s, &ApiRegistry::new()).is_ok());
    }
}
