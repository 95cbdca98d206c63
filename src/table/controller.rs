//! Table controller: list-view state for one resource and fetch orchestration.
//!
//! Every fetch is tagged with a generation number. Only the most recently issued fetch may
//! write rows back; older results that resolve late are discarded. A failed fetch keeps the
//! rows from the last successful one.

use crate::codec::{value_to_key, Filter, PaginationRequest, SortDirection, DEFAULT_PAGE_SIZE};
use crate::config::ClientConfig;
use crate::envelope::PageResponse;
use crate::error::ApiError;
use crate::schema::{ResolvedColumn, ResolvedSchema, SelectOption};
use crate::service::CrudSource;
use crate::table::{Selection, SelectionPolicy, SortState};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How many rows a relation picker asks its companion resource for.
pub const RELATION_OPTION_LIMIT: u32 = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableStatus {
    Idle,
    Loading,
    Loaded,
    /// Last fetch failed; rows from the previous successful fetch are still shown.
    Error(String),
}

/// Whether a fetch result made it into the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Superseded,
    /// Nothing to fetch (e.g. `next_page` on the last page).
    Skipped,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> From<&PageResponse<T>> for PageMeta {
    fn from(p: &PageResponse<T>) -> Self {
        Self {
            page: p.page,
            size: p.size,
            total_pages: p.total_pages,
            total_elements: p.total_elements,
            has_next: p.has_next,
            has_previous: p.has_previous,
        }
    }
}

/// Field -> (value as string -> label), for relation columns whose options were loaded.
pub type RelationLabels = HashMap<String, HashMap<String, String>>;

/// Point-in-time copy of controller state, handed to the view.
#[derive(Clone, Debug)]
pub struct TableSnapshot<T> {
    pub rows: Vec<T>,
    pub meta: Option<PageMeta>,
    pub page: u32,
    pub size: u32,
    pub sort: SortState,
    pub filter: Filter,
    pub keyword: String,
    pub selection: Selection,
    pub visible_columns: Vec<String>,
    pub status: TableStatus,
    pub generation: u64,
}

struct TableState<T> {
    page: u32,
    size: u32,
    sort: SortState,
    filter: Filter,
    keyword: String,
    selection: Selection,
    column_visibility: HashMap<String, bool>,
    rows: Vec<T>,
    meta: Option<PageMeta>,
    status: TableStatus,
    generation: u64,
}

impl<T> TableState<T> {
    fn pagination(&self) -> PaginationRequest {
        PaginationRequest::new(self.page, self.size).with_sort(self.sort.entries().to_vec())
    }
}

pub struct TableController<A: CrudSource> {
    source: Arc<A>,
    schema: Arc<ResolvedSchema>,
    policy: SelectionPolicy,
    state: Mutex<TableState<A::Item>>,
    relation_options: Mutex<HashMap<String, Vec<SelectOption>>>,
}

impl<A> TableController<A>
where
    A: CrudSource,
    A::Item: Serialize + Clone,
{
    pub fn new(source: Arc<A>, schema: Arc<ResolvedSchema>) -> Self {
        Self {
            source,
            schema,
            policy: SelectionPolicy::default(),
            state: Mutex::new(TableState {
                page: 0,
                size: DEFAULT_PAGE_SIZE,
                sort: SortState::new(),
                filter: Filter::new(),
                keyword: String::new(),
                selection: Selection::default(),
                column_visibility: HashMap::new(),
                rows: Vec::new(),
                meta: None,
                status: TableStatus::Idle,
                generation: 0,
            }),
            relation_options: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(source: Arc<A>, schema: Arc<ResolvedSchema>, config: &ClientConfig) -> Self {
        Self::new(source, schema)
            .with_page_size(config.default_page_size)
            .with_selection_policy(config.selection_policy)
    }

    pub fn with_page_size(self, size: u32) -> Self {
        self.lock().size = size.max(1);
        self
    }

    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    pub fn source(&self) -> &A {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, TableState<A::Item>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sortable_column(&self, field: &str) -> Result<&ResolvedColumn, ApiError> {
        let col = self
            .schema
            .column(field)
            .ok_or_else(|| ApiError::Validation(format!("unknown column '{}'", field)))?;
        if !col.sortable {
            return Err(ApiError::Validation(format!("column '{}' is not sortable", field)));
        }
        Ok(col)
    }

    fn row_id(&self, row: &A::Item) -> Option<String> {
        serde_json::to_value(row).ok().and_then(|v| self.schema.id_of(&v))
    }

    pub fn snapshot(&self) -> TableSnapshot<A::Item> {
        let visible_columns = self.visible_columns();
        let st = self.lock();
        TableSnapshot {
            rows: st.rows.clone(),
            meta: st.meta.clone(),
            page: st.page,
            size: st.size,
            sort: st.sort.clone(),
            filter: st.filter.clone(),
            keyword: st.keyword.clone(),
            selection: st.selection.clone(),
            visible_columns,
            status: st.status.clone(),
            generation: st.generation,
        }
    }

    pub fn status(&self) -> TableStatus {
        self.lock().status.clone()
    }

    pub fn rows(&self) -> Vec<A::Item> {
        self.lock().rows.clone()
    }

    pub fn meta(&self) -> Option<PageMeta> {
        self.lock().meta.clone()
    }

    /// The query the next fetch would send.
    pub fn current_query(&self) -> (String, PaginationRequest, Filter) {
        let st = self.lock();
        (st.keyword.clone(), st.pagination(), st.filter.clone())
    }

    /// Initial load.
    pub async fn load(&self) -> Result<FetchOutcome, ApiError> {
        self.refresh().await
    }

    /// Fetch with the current parameters. Superseded results are dropped, errors included.
    pub async fn refresh(&self) -> Result<FetchOutcome, ApiError> {
        let (generation, keyword, pagination, filter) = {
            let mut st = self.lock();
            st.generation += 1;
            st.status = TableStatus::Loading;
            (st.generation, st.keyword.clone(), st.pagination(), st.filter.clone())
        };
        tracing::debug!(
            entity = %self.schema.entity_name,
            generation,
            page = pagination.page.unwrap_or_default(),
            "fetching"
        );

        let result = self.source.search(&keyword, &pagination, &filter).await;

        let mut st = self.lock();
        if st.generation != generation {
            tracing::debug!(
                entity = %self.schema.entity_name,
                generation,
                current = st.generation,
                "discarding superseded fetch"
            );
            return Ok(FetchOutcome::Superseded);
        }
        match result {
            Ok(page) => {
                st.meta = Some(PageMeta::from(&page));
                st.rows = page.items;
                st.status = TableStatus::Loaded;
                if self.policy == SelectionPolicy::PruneToPage {
                    let on_page: HashSet<String> =
                        st.rows.iter().filter_map(|r| self.row_id(r)).collect();
                    st.selection.retain_only(&on_page);
                }
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!(
                    entity = %self.schema.entity_name,
                    generation,
                    error = %e,
                    "fetch failed"
                );
                st.status = TableStatus::Error(e.message());
                Err(e)
            }
        }
    }

    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome, ApiError> {
        self.lock().page = page;
        self.refresh().await
    }

    pub async fn next_page(&self) -> Result<FetchOutcome, ApiError> {
        let next = {
            let st = self.lock();
            match &st.meta {
                Some(m) if m.has_next => st.page + 1,
                _ => return Ok(FetchOutcome::Skipped),
            }
        };
        self.set_page(next).await
    }

    pub async fn previous_page(&self) -> Result<FetchOutcome, ApiError> {
        let prev = {
            let st = self.lock();
            if st.page == 0 {
                return Ok(FetchOutcome::Skipped);
            }
            st.page - 1
        };
        self.set_page(prev).await
    }

    /// Changing page size returns to the first page.
    pub async fn set_page_size(&self, size: u32) -> Result<FetchOutcome, ApiError> {
        if size == 0 {
            return Err(ApiError::Validation("page size must be positive".into()));
        }
        {
            let mut st = self.lock();
            st.size = size;
            st.page = 0;
        }
        self.refresh().await
    }

    /// Advance one column through `unsorted -> asc -> desc -> unsorted` and refetch.
    pub async fn toggle_sort(&self, field: &str) -> Result<Option<SortDirection>, ApiError> {
        self.sortable_column(field)?;
        let dir = self.lock().sort.toggle(field);
        self.refresh().await?;
        Ok(dir)
    }

    pub async fn clear_sort(&self) -> Result<FetchOutcome, ApiError> {
        self.lock().sort.clear();
        self.refresh().await
    }

    /// Empty values clear the key instead of sending it.
    pub async fn set_filter(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<FetchOutcome, ApiError> {
        if let Some(col) = self.schema.column(field) {
            if col.filter.is_none() {
                return Err(ApiError::Validation(format!("column '{}' is not filterable", field)));
            }
        }
        {
            let mut st = self.lock();
            st.filter.set(field, value);
            st.page = 0;
        }
        self.refresh().await
    }

    pub async fn clear_filter(&self, field: &str) -> Result<FetchOutcome, ApiError> {
        {
            let mut st = self.lock();
            st.filter.remove(field);
            st.page = 0;
        }
        self.refresh().await
    }

    pub async fn clear_filters(&self) -> Result<FetchOutcome, ApiError> {
        {
            let mut st = self.lock();
            st.filter.clear();
            st.keyword.clear();
            st.page = 0;
        }
        self.refresh().await
    }

    pub async fn set_keyword(&self, keyword: &str) -> Result<FetchOutcome, ApiError> {
        {
            let mut st = self.lock();
            st.keyword = keyword.trim().to_string();
            st.page = 0;
        }
        self.refresh().await
    }

    pub fn select(&self, id: impl Into<String>) {
        self.lock().selection.select(id);
    }

    pub fn deselect(&self, id: &str) {
        self.lock().selection.deselect(id);
    }

    pub fn toggle_selected(&self, id: &str) -> bool {
        self.lock().selection.toggle(id)
    }

    /// Select every row currently loaded.
    pub fn select_page(&self) {
        let mut st = self.lock();
        let ids: Vec<String> = st.rows.iter().filter_map(|r| self.row_id(r)).collect();
        for id in ids {
            st.selection.select(id);
        }
    }

    pub fn clear_selection(&self) {
        self.lock().selection.clear();
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.lock().selection.ids()
    }

    /// Show or hide a column. Returns its new visibility.
    pub fn toggle_column(&self, field: &str) -> Result<bool, ApiError> {
        let col = self
            .schema
            .column(field)
            .ok_or_else(|| ApiError::Validation(format!("unknown column '{}'", field)))?;
        if !col.hideable {
            return Err(ApiError::Validation(format!("column '{}' cannot be hidden", field)));
        }
        let mut st = self.lock();
        let now = !st
            .column_visibility
            .get(field)
            .copied()
            .unwrap_or(col.visible_by_default);
        st.column_visibility.insert(field.to_string(), now);
        Ok(now)
    }

    pub fn visible_columns(&self) -> Vec<String> {
        let st = self.lock();
        self.schema
            .columns
            .iter()
            .filter(|c| {
                if !c.hideable {
                    return c.visible_by_default;
                }
                st.column_visibility
                    .get(&c.name)
                    .copied()
                    .unwrap_or(c.visible_by_default)
            })
            .map(|c| c.name.clone())
            .collect()
    }

    pub async fn create(&self, data: &A::Create) -> Result<A::Item, ApiError> {
        let item = self.source.create(data).await?;
        self.refresh_after_mutation("create").await;
        Ok(item)
    }

    pub async fn update(&self, id: &str, data: &A::Update) -> Result<A::Item, ApiError> {
        let item = self.source.update(id, data).await?;
        self.refresh_after_mutation("update").await;
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.source.delete(id).await?;
        self.lock().selection.deselect(id);
        self.refresh_after_mutation("delete").await;
        Ok(())
    }

    /// Delete every selected row, one request each, stopping at the first failure.
    /// Deleted ids leave the selection either way; the table is refreshed afterwards.
    /// The result reflects the deletes only; a failed refresh shows up in `status()`.
    pub async fn delete_selected(&self) -> Result<usize, ApiError> {
        let ids = self.selected_ids();
        let mut deleted = 0;
        let mut failure = None;
        for id in &ids {
            match self.source.delete(id).await {
                Ok(()) => {
                    self.lock().selection.deselect(id);
                    deleted += 1;
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        tracing::info!(
            entity = %self.schema.entity_name,
            deleted,
            requested = ids.len(),
            "bulk delete"
        );
        self.refresh_after_mutation("bulk delete").await;
        match failure {
            Some(e) => Err(e),
            None => Ok(deleted),
        }
    }

    /// The mutation already reached the server, so a failed refetch only marks the table as
    /// errored (previous rows kept) and is not reported as the mutation's failure.
    async fn refresh_after_mutation(&self, action: &str) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(
                entity = %self.schema.entity_name,
                action,
                error = %e,
                "refresh after mutation failed"
            );
        }
    }

    /// Options for a relation column, fetched from its companion resource once and cached.
    pub async fn relation_options(&self, field: &str) -> Result<Vec<SelectOption>, ApiError> {
        let col = self
            .schema
            .column(field)
            .ok_or_else(|| ApiError::Validation(format!("unknown column '{}'", field)))?;
        let binding = col
            .relation
            .as_ref()
            .ok_or_else(|| ApiError::Validation(format!("column '{}' is not a relation", field)))?;
        let cached = self.options_cache().get(field).cloned();
        if let Some(options) = cached {
            return Ok(options);
        }
        let rows = binding.source.options("", RELATION_OPTION_LIMIT).await?;
        let options: Vec<SelectOption> = rows
            .iter()
            .filter_map(|row| {
                let value = row.get(&binding.value_field)?.clone();
                let label = match row.get(&binding.label_field) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => value_to_key(&value),
                    Some(other) => other.to_string(),
                };
                Some(SelectOption { value, label })
            })
            .collect();
        tracing::debug!(
            field,
            api = %binding.api,
            count = options.len(),
            "relation options loaded"
        );
        self.options_cache().insert(field.to_string(), options.clone());
        Ok(options)
    }

    /// Load options for every relation column.
    pub async fn load_relations(&self) -> Result<(), ApiError> {
        let fields: Vec<String> = self.schema.relation_columns().map(|c| c.name.clone()).collect();
        for f in fields {
            self.relation_options(&f).await?;
        }
        Ok(())
    }

    pub fn reload_relations(&self) {
        self.options_cache().clear();
    }

    pub fn relation_labels(&self) -> RelationLabels {
        self.options_cache()
            .iter()
            .map(|(field, opts)| {
                let labels = opts
                    .iter()
                    .map(|o| (value_to_key(&o.value), o.label.clone()))
                    .collect();
                (field.clone(), labels)
            })
            .collect()
    }

    fn options_cache(&self) -> MutexGuard<'_, HashMap<String, Vec<SelectOption>>> {
        self.relation_options.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
