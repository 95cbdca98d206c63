//! Declarative entity schema as authored (Rust literals or JSON).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Password,
    Number,
    Date,
    Select,
    Boolean,
    Relation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    Text,
    Select,
    Boolean,
    DateRange,
    NumberRange,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanLabels {
    #[serde(rename = "true")]
    pub true_label: String,
    #[serde(rename = "false")]
    pub false_label: String,
}

impl Default for BooleanLabels {
    fn default() -> Self {
        Self {
            true_label: "Yes".into(),
            false_label: "No".into(),
        }
    }
}

/// Relation binding as authored: `api` names a registered companion resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationConfig {
    pub api: String,
    pub value_field: String,
    pub label_field: String,
    #[serde(default)]
    pub multiple: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub filter_type: Option<FilterType>,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub hideable: bool,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub boolean_labels: Option<BooleanLabels>,
    #[serde(default)]
    pub relation: Option<RelationConfig>,
}

fn default_true() -> bool {
    true
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            sortable: false,
            filterable: false,
            filter_type: None,
            editable: true,
            visible: true,
            hideable: true,
            options: Vec::new(),
            boolean_labels: None,
            relation: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filter(mut self, filter_type: FilterType) -> Self {
        self.filterable = true;
        self.filter_type = Some(filter_type);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn boolean_labels(mut self, true_label: &str, false_label: &str) -> Self {
        self.boolean_labels = Some(BooleanLabels {
            true_label: true_label.into(),
            false_label: false_label.into(),
        });
        self
    }

    pub fn relation(mut self, api: &str, value_field: &str, label_field: &str, multiple: bool) -> Self {
        self.relation = Some(RelationConfig {
            api: api.into(),
            value_field: value_field.into(),
            label_field: label_field.into(),
            multiple,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySchema {
    pub entity_name: String,
    pub id_field: String,
    pub fields: Vec<FieldSchema>,
}

impl EntitySchema {
    pub fn new(entity_name: impl Into<String>, id_field: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            entity_name: entity_name.into(),
            id_field: id_field.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}
