//! Resource-specific adapters composed over a `CrudSource`. The factory itself stays uniform.

use crate::codec::{Filter, PaginationRequest};
use crate::envelope::PageResponse;
use crate::error::ApiError;
use crate::service::CrudSource;
use async_trait::async_trait;

/// Upper bound on pages walked by `list_all`.
const MAX_PAGES: u32 = 500;

/// Walk every page of a search and return all items in server order.
pub async fn list_all<A: CrudSource + ?Sized>(
    source: &A,
    keyword: &str,
    filter: &Filter,
    page_size: u32,
) -> Result<Vec<A::Item>, ApiError> {
    let mut out = Vec::new();
    let mut page = 0;
    loop {
        let resp = source
            .search(keyword, &PaginationRequest::new(page, page_size.max(1)), filter)
            .await?;
        let has_next = resp.has_next;
        out.extend(resp.items);
        page += 1;
        if !has_next {
            break;
        }
        if page >= MAX_PAGES {
            tracing::warn!(pages = page, "list_all stopped at page limit");
            break;
        }
    }
    Ok(out)
}

/// A resource view pinned to a fixed filter (e.g. lessons of one course).
/// Caller filters are merged on top; the pinned keys always win.
pub struct ScopedApi<A> {
    inner: A,
    scope: Filter,
}

impl<A> ScopedApi<A> {
    pub fn new(inner: A, scope: Filter) -> Self {
        Self { inner, scope }
    }

    pub fn scope(&self) -> &Filter {
        &self.scope
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: CrudSource> CrudSource for ScopedApi<A> {
    type Item = A::Item;
    type Create = A::Create;
    type Update = A::Update;

    async fn search(
        &self,
        keyword: &str,
        pagination: &PaginationRequest,
        filter: &Filter,
    ) -> Result<PageResponse<A::Item>, ApiError> {
        let merged = filter.merged(&self.scope);
        self.inner.search(keyword, pagination, &merged).await
    }

    async fn get_by_id(&self, id: &str) -> Result<A::Item, ApiError> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, data: &A::Create) -> Result<A::Item, ApiError> {
        self.inner.create(data).await
    }

    async fn update(&self, id: &str, data: &A::Update) -> Result<A::Item, ApiError> {
        self.inner.update(id, data).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.inner.delete(id).await
    }
}
