//! Presentation table: schema + snapshot in, headers/rows/footer out. No business logic.

use crate::codec::{value_to_key, SortDirection};
use crate::schema::{FieldType, FilterEditor, ResolvedColumn, ResolvedSchema};
use crate::table::controller::{RelationLabels, TableSnapshot, TableStatus};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

const PASSWORD_MASK: &str = "********";

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderCell {
    pub name: String,
    pub label: String,
    /// Direction and 1-based precedence when the column takes part in the sort.
    pub sort: Option<(SortDirection, usize)>,
    pub sortable: bool,
    pub filter: Option<FilterEditor>,
    pub active_filter: Option<Value>,
    pub hideable: bool,
    /// Shown but never offered for editing (the id field and `editable: false` fields).
    pub read_only: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    pub id: Option<String>,
    pub selected: bool,
    pub cells: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footer {
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub selected: usize,
    pub status: TableStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RowView>,
    pub footer: Footer,
}

impl TableView {
    pub fn render<T: Serialize>(
        schema: &ResolvedSchema,
        snapshot: &TableSnapshot<T>,
        labels: &RelationLabels,
    ) -> TableView {
        let columns: Vec<&ResolvedColumn> = snapshot
            .visible_columns
            .iter()
            .filter_map(|name| schema.column(name))
            .collect();

        let headers = columns
            .iter()
            .map(|c| HeaderCell {
                name: c.name.clone(),
                label: c.label.clone(),
                sort: snapshot.sort.position(&c.name),
                sortable: c.sortable,
                filter: c.filter.clone(),
                active_filter: snapshot.filter.get(&c.name).cloned(),
                hideable: c.hideable,
                read_only: c.read_only,
            })
            .collect();

        let rows = snapshot
            .rows
            .iter()
            .map(|row| {
                let value = serde_json::to_value(row).unwrap_or(Value::Null);
                let id = schema.id_of(&value);
                RowView {
                    selected: id
                        .as_deref()
                        .map(|i| snapshot.selection.contains(i))
                        .unwrap_or(false),
                    id,
                    cells: columns
                        .iter()
                        .map(|c| format_cell(c, value.get(&c.name).unwrap_or(&Value::Null), labels))
                        .collect(),
                }
            })
            .collect();

        let meta = snapshot.meta.clone().unwrap_or_default();
        TableView {
            title: schema.entity_name.clone(),
            headers,
            rows,
            footer: Footer {
                page: meta.page,
                total_pages: meta.total_pages,
                total_elements: meta.total_elements,
                has_next: meta.has_next,
                has_previous: meta.has_previous,
                selected: snapshot.selection.len(),
                status: snapshot.status.clone(),
            },
        }
    }
}

/// Display text for one cell.
pub fn format_cell(column: &ResolvedColumn, value: &Value, labels: &RelationLabels) -> String {
    if value.is_null() {
        return String::new();
    }
    match column.field_type {
        FieldType::Password => PASSWORD_MASK.to_string(),
        FieldType::Boolean => match value.as_bool() {
            Some(true) => column.boolean_labels.true_label.clone(),
            Some(false) => column.boolean_labels.false_label.clone(),
            None => value_to_key(value),
        },
        FieldType::Select => column
            .option_label(value)
            .map(str::to_string)
            .unwrap_or_else(|| value_to_key(value)),
        FieldType::Relation => {
            let lookup = labels.get(&column.name);
            let label_of = |v: &Value| {
                let key = value_to_key(v);
                lookup.and_then(|l| l.get(&key)).cloned().unwrap_or(key)
            };
            match value {
                Value::Array(items) => items.iter().map(label_of).collect::<Vec<_>>().join(", "),
                // Embedded related object: show its label field directly.
                Value::Object(obj) => column
                    .relation
                    .as_ref()
                    .and_then(|r| obj.get(&r.label_field))
                    .map(value_to_key)
                    .unwrap_or_default(),
                other => label_of(other),
            }
        }
        FieldType::Text | FieldType::Number | FieldType::Date => value_to_key(value),
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<String> = self
            .headers
            .iter()
            .map(|h| match h.sort {
                Some((SortDirection::Asc, n)) => format!("{} ^{}", h.label, n),
                Some((SortDirection::Desc, n)) => format!("{} v{}", h.label, n),
                None => h.label.clone(),
            })
            .collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        writeln!(f, "{}", self.title)?;
        let line = |f: &mut fmt::Formatter<'_>, marker: &str, cells: &[String]| -> fmt::Result {
            write!(f, "{} ", marker)?;
            for (i, c) in cells.iter().enumerate() {
                write!(f, "| {:<w$} ", c, w = widths[i])?;
            }
            writeln!(f, "|")
        };
        line(f, " ", &headers)?;
        for row in &self.rows {
            line(f, if row.selected { "*" } else { " " }, &row.cells)?;
        }
        let ft = &self.footer;
        write!(
            f,
            "page {}/{} ({} total, {} selected)",
            ft.page + 1,
            ft.total_pages.max(1),
            ft.total_elements,
            ft.selected
        )?;
        if let TableStatus::Error(msg) = &ft.status {
            write!(f, " error: {}", msg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Filter;
    use crate::schema::{resolve, EntitySchema, FieldSchema, FilterType, SelectOption};
    use crate::service::ApiRegistry;
    use crate::table::controller::PageMeta;
    use crate::table::{Selection, SortState};
    use serde_json::json;
    use std::collections::HashMap;

    fn schema() -> ResolvedSchema {
        resolve(
            &EntitySchema::new(
                "course",
                "id",
                vec![
                    FieldSchema::new("id", "ID", FieldType::Number).sortable(),
                    FieldSchema::new("title", "Title", FieldType::Text).sortable().filter(FilterType::Text),
                    FieldSchema::new("level", "Level", FieldType::Select).options(vec![
                        SelectOption::new("BEGINNER", "Beginner"),
                        SelectOption::new("ADVANCED", "Advanced"),
                    ]),
                    FieldSchema::new("published", "Published", FieldType::Boolean),
                    FieldSchema::new("secret", "Secret", FieldType::Password),
                ],
            ),
            &ApiRegistry::new(),
        )
        .unwrap()
    }

    fn snapshot(rows: Vec<Value>) -> TableSnapshot<Value> {
        let mut sort = SortState::new();
        sort.toggle("title");
        sort.toggle("id");
        sort.toggle("id");
        let mut selection = Selection::default();
        selection.select("2");
        TableSnapshot {
            rows,
            meta: Some(PageMeta { page: 0, size: 20, total_pages: 1, total_elements: 2, has_next: false, has_previous: false }),
            page: 0,
            size: 20,
            sort,
            filter: Filter::new().with("title", "rust"),
            keyword: String::new(),
            selection,
            visible_columns: vec!["id".into(), "title".into(), "level".into(), "published".into(), "secret".into()],
            status: TableStatus::Loaded,
            generation: 1,
        }
    }

    #[test]
    fn renders_headers_rows_and_footer() {
        let view = TableView::render(
            &schema(),
            &snapshot(vec![
                json!({"id": 1, "title": "Rust 101", "level": "BEGINNER", "published": true, "secret": "x"}),
                json!({"id": 2, "title": "Rust 201", "level": "EXPERT", "published": false, "secret": null}),
            ]),
            &HashMap::new(),
        );
        assert_eq!(view.headers[1].sort, Some((SortDirection::Asc, 1)));
        assert_eq!(view.headers[0].sort, Some((SortDirection::Desc, 2)));
        assert_eq!(view.headers[1].active_filter, Some(json!("rust")));
        assert_eq!(view.rows[0].cells, vec!["1", "Rust 101", "Beginner", "Yes", PASSWORD_MASK]);
        assert_eq!(view.rows[1].cells, vec!["2", "Rust 201", "EXPERT", "No", ""]);
        assert!(!view.rows[0].selected && view.rows[1].selected);
        assert_eq!(view.footer.selected, 1);

        let text = view.to_string();
        assert!(text.contains("Title ^1"));
        assert!(text.contains("page 1/1 (2 total, 1 selected)"));
    }

    #[test]
    fn headers_mark_id_and_non_editable_columns_read_only() {
        let schema = resolve(
            &EntitySchema::new(
                "course",
                "id",
                vec![
                    FieldSchema::new("id", "ID", FieldType::Number),
                    FieldSchema::new("title", "Title", FieldType::Text),
                    FieldSchema::new("createdAt", "Created", FieldType::Date).read_only(),
                ],
            ),
            &ApiRegistry::new(),
        )
        .unwrap();
        let mut snap = snapshot(vec![json!({"id": 1, "title": "Rust 101", "createdAt": "2024-01-01"})]);
        snap.visible_columns = vec!["id".into(), "title".into(), "createdAt".into()];
        let view = TableView::render(&schema, &snap, &HashMap::new());
        let read_only: Vec<(&str, bool)> =
            view.headers.iter().map(|h| (h.name.as_str(), h.read_only)).collect();
        assert_eq!(read_only, vec![("id", true), ("title", false), ("createdAt", true)]);
    }

    #[test]
    fn relation_cells_use_loaded_labels() {
        let mut registry = ApiRegistry::new();
        struct Empty;
        #[async_trait::async_trait]
        impl crate::service::RelationSource for Empty {
            async fn options(&self, _: &str, _: u32) -> Result<Vec<Value>, crate::error::ApiError> {
                Ok(Vec::new())
            }
        }
        registry.register("roles", std::sync::Arc::new(Empty));
        let schema = resolve(
            &EntitySchema::new(
                "user",
                "id",
                vec![
                    FieldSchema::new("id", "ID", FieldType::Number),
                    FieldSchema::new("roleIds", "Roles", FieldType::Relation).relation("roles", "id", "name", true),
                ],
            ),
            &registry,
        )
        .unwrap();
        let col = schema.column("roleIds").unwrap();
        let mut labels = RelationLabels::new();
        labels.insert(
            "roleIds".into(),
            [("1".to_string(), "Admin".to_string()), ("2".to_string(), "Trainer".to_string())]
                .into_iter()
                .collect(),
        );
        assert_eq!(format_cell(col, &json!([1, 2, 3]), &labels), "Admin, Trainer, 3");
        assert_eq!(format_cell(col, &json!({"id": 1, "name": "Admin"}), &labels), "Admin");
    }
}
