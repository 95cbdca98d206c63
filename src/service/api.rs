//! Generic CRUD client for one resource path.

use crate::codec::{search_params, Filter, PaginationRequest};
use crate::envelope::{decode_page, PageResponse};
use crate::error::{ApiError, ConfigError};
use crate::http::HttpClient;
use crate::service::RelationSource;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Identifier argument. `None` models an absent id and is rejected before any request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityId(Option<String>);

impl EntityId {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Non-blank id usable as a single path segment.
    pub fn require(&self) -> Result<&str, ApiError> {
        let id = self
            .0
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::Validation("id is required".into()))?;
        if id.contains(['/', '?', '#']) {
            return Err(ApiError::Validation(format!("invalid id '{}'", id)));
        }
        Ok(id)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(Some(s.to_string()))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(Some(s))
    }
}

impl From<&String> for EntityId {
    fn from(s: &String) -> Self {
        EntityId(Some(s.clone()))
    }
}

macro_rules! entity_id_from_display {
    ($($t:ty),*) => {
        $(impl From<$t> for EntityId {
            fn from(v: $t) -> Self {
                EntityId(Some(v.to_string()))
            }
        })*
    };
}

entity_id_from_display!(i32, i64, u32, u64, uuid::Uuid);

impl<T: Into<EntityId>> From<Option<T>> for EntityId {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(EntityId(None))
    }
}

/// Normalise a resource path to `/segment[/segment...]`.
pub fn normalize_path(path: &str) -> Result<String, ConfigError> {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::MissingPath);
    }
    Ok(format!("/{}", trimmed))
}

/// CRUD client parameterised by response, filter, create-request and update-request types.
pub struct EntityApi<R, F = Filter, C = R, U = C> {
    client: Arc<dyn HttpClient>,
    path: String,
    _types: PhantomData<fn() -> (R, F, C, U)>,
}

impl<R, F, C, U> Clone for EntityApi<R, F, C, U> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            _types: PhantomData,
        }
    }
}

impl<R, F, C, U> fmt::Debug for EntityApi<R, F, C, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityApi").field("path", &self.path).finish()
    }
}

pub struct EntityApiBuilder<R, F = Filter, C = R, U = C> {
    client: Option<Arc<dyn HttpClient>>,
    path: Option<String>,
    _types: PhantomData<fn() -> (R, F, C, U)>,
}

impl<R, F, C, U> EntityApiBuilder<R, F, C, U> {
    pub fn client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<EntityApi<R, F, C, U>, ConfigError> {
        EntityApi::new(self.client, self.path.as_deref().unwrap_or(""))
    }
}

impl<R, F, C, U> EntityApi<R, F, C, U> {
    pub fn builder() -> EntityApiBuilder<R, F, C, U> {
        EntityApiBuilder {
            client: None,
            path: None,
            _types: PhantomData,
        }
    }

    /// Fails immediately when the client is absent or the path is blank.
    pub fn new(client: Option<Arc<dyn HttpClient>>, path: &str) -> Result<Self, ConfigError> {
        let client = client.ok_or(ConfigError::MissingClient)?;
        let path = normalize_path(path)?;
        Ok(Self {
            client,
            path,
            _types: PhantomData,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn item_path(&self, id: &EntityId) -> Result<String, ApiError> {
        Ok(format!("{}/{}", self.path, id.require()?))
    }

    async fn search_json(
        &self,
        keyword: &str,
        pagination: Option<&PaginationRequest>,
        filter: &Filter,
    ) -> Result<Value, ApiError> {
        let query = search_params(keyword, pagination, filter);
        tracing::debug!(path = %self.path, params = query.len(), "search");
        self.client.get(&self.path, &query).await?.json()
    }

    async fn search_filter(
        &self,
        keyword: &str,
        pagination: Option<&PaginationRequest>,
        filter: &Filter,
    ) -> Result<PageResponse<R>, ApiError>
    where
        R: DeserializeOwned,
    {
        decode_page(self.search_json(keyword, pagination, filter).await?)
    }

    async fn fetch_one(&self, id: &EntityId) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let path = self.item_path(id)?;
        let body = self.client.get(&path, &[]).await?.json()?;
        Ok(serde_json::from_value(body)?)
    }

    async fn post_one(&self, data: &C) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        C: Serialize,
    {
        let body = self.client.post(&self.path, serde_json::to_value(data)?).await?.json()?;
        tracing::info!(path = %self.path, "created");
        Ok(serde_json::from_value(body)?)
    }

    async fn put_one(&self, id: &EntityId, data: &U) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        U: Serialize,
    {
        let path = self.item_path(id)?;
        let body = self.client.put(&path, serde_json::to_value(data)?).await?.json()?;
        tracing::info!(%path, "updated");
        Ok(serde_json::from_value(body)?)
    }

    async fn remove(&self, id: &EntityId) -> Result<(), ApiError> {
        let path = self.item_path(id)?;
        self.client.delete(&path).await?;
        tracing::info!(%path, "deleted");
        Ok(())
    }
}

impl<R, F, C, U> EntityApi<R, F, C, U>
where
    R: DeserializeOwned,
    F: Serialize,
    C: Serialize,
    U: Serialize,
{
    /// Keyword + pagination + typed filter list query. Empty filter members are not sent.
    pub async fn search(
        &self,
        keyword: &str,
        pagination: Option<&PaginationRequest>,
        filter: Option<&F>,
    ) -> Result<PageResponse<R>, ApiError> {
        let filter = match filter {
            Some(f) => Filter::from_serialize(f)?,
            None => Filter::new(),
        };
        self.search_filter(keyword, pagination, &filter).await
    }

    pub async fn get_by_id(&self, id: impl Into<EntityId>) -> Result<R, ApiError> {
        self.fetch_one(&id.into()).await
    }

    pub async fn create(&self, data: &C) -> Result<R, ApiError> {
        self.post_one(data).await
    }

    /// Full-resource replace.
    pub async fn update(&self, id: impl Into<EntityId>, data: &U) -> Result<R, ApiError> {
        self.put_one(&id.into(), data).await
    }

    pub async fn delete(&self, id: impl Into<EntityId>) -> Result<(), ApiError> {
        self.remove(&id.into()).await
    }
}

/// The five operations over the open `Filter` map, so controllers can drive any resource.
#[async_trait]
pub trait CrudSource: Send + Sync {
    type Item: Send + 'static;
    type Create: Send + Sync;
    type Update: Send + Sync;

    async fn search(
        &self,
        keyword: &str,
        pagination: &PaginationRequest,
        filter: &Filter,
    ) -> Result<PageResponse<Self::Item>, ApiError>;

    async fn get_by_id(&self, id: &str) -> Result<Self::Item, ApiError>;

    async fn create(&self, data: &Self::Create) -> Result<Self::Item, ApiError>;

    async fn update(&self, id: &str, data: &Self::Update) -> Result<Self::Item, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl<R, F, C, U> CrudSource for EntityApi<R, F, C, U>
where
    R: DeserializeOwned + Send + 'static,
    C: Serialize + Send + Sync,
    U: Serialize + Send + Sync,
{
    type Item = R;
    type Create = C;
    type Update = U;

    async fn search(
        &self,
        keyword: &str,
        pagination: &PaginationRequest,
        filter: &Filter,
    ) -> Result<PageResponse<R>, ApiError> {
        self.search_filter(keyword, Some(pagination), filter).await
    }

    async fn get_by_id(&self, id: &str) -> Result<R, ApiError> {
        self.fetch_one(&id.into()).await
    }

    async fn create(&self, data: &C) -> Result<R, ApiError> {
        self.post_one(data).await
    }

    async fn update(&self, id: &str, data: &U) -> Result<R, ApiError> {
        self.put_one(&id.into(), data).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.remove(&id.into()).await
    }
}

#[async_trait]
impl<R, F, C, U> RelationSource for EntityApi<R, F, C, U> {
    async fn options(&self, keyword: &str, size: u32) -> Result<Vec<Value>, ApiError> {
        let pagination = PaginationRequest::new(0, size);
        let page: PageResponse<Value> = decode_page(self.search_json(keyword, Some(&pagination), &Filter::new()).await?)?;
        Ok(page.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use http::Method;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(Method, String, Vec<(String, String)>)>>,
    }

    #[async_trait]
    impl HttpClient for Recorder {
        async fn request(
            &self,
            method: Method,
            path: &str,
            query: &[(String, String)],
            _body: Option<Value>,
        ) -> Result<HttpResponse, ApiError> {
            self.calls.lock().unwrap().push((method, path.to_string(), query.to_vec()));
            Ok(HttpResponse {
                status: 200,
                body: br#"{"id": 1, "name": "Ann"}"#.to_vec(),
            })
        }
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Row {
        id: i64,
        name: String,
    }

    fn api(rec: Arc<Recorder>, path: &str) -> EntityApi<Row> {
        EntityApi::new(Some(rec), path).unwrap()
    }

    #[test]
    fn construction_requires_client_and_path() {
        let rec: Arc<dyn HttpClient> = Arc::new(Recorder::default());
        assert_eq!(
            EntityApi::<Row>::new(None, "/users").unwrap_err(),
            ConfigError::MissingClient
        );
        assert_eq!(
            EntityApi::<Row>::new(Some(rec.clone()), "  ").unwrap_err(),
            ConfigError::MissingPath
        );
        assert_eq!(
            EntityApi::<Row>::builder().client(rec).build().unwrap_err(),
            ConfigError::MissingPath
        );
    }

    #[test]
    fn path_is_normalized() {
        let rec = Arc::new(Recorder::default());
        assert_eq!(api(rec.clone(), "users").path(), "/users");
        assert_eq!(api(rec.clone(), "//users/").path(), "/users");
        assert_eq!(api(rec, "/training/classes").path(), "/training/classes");
    }

    #[tokio::test]
    async fn blank_or_absent_id_fails_before_network() {
        let rec = Arc::new(Recorder::default());
        let users = api(rec.clone(), "/users");
        let row = Row { id: 1, name: "x".into() };
        assert!(matches!(users.get_by_id("").await, Err(ApiError::Validation(_))));
        assert!(matches!(users.get_by_id(None::<&str>).await, Err(ApiError::Validation(_))));
        assert!(matches!(users.update("  ", &row).await, Err(ApiError::Validation(_))));
        assert!(matches!(users.delete(None::<i64>).await, Err(ApiError::Validation(_))));
        assert!(matches!(users.delete("a/b").await, Err(ApiError::Validation(_))));
        assert!(rec.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn item_operations_use_path_convention() {
        let rec = Arc::new(Recorder::default());
        let users = api(rec.clone(), "users");
        let row = users.get_by_id(1_i64).await.unwrap();
        assert_eq!(row, Row { id: 1, name: "Ann".into() });
        users.update("1", &row).await.unwrap();
        users.delete("1").await.unwrap();
        users.create(&row).await.unwrap();
        let calls = rec.calls.lock().unwrap();
        let summary: Vec<_> = calls.iter().map(|(m, p, _)| (m.clone(), p.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (Method::GET, "/users/1"),
                (Method::PUT, "/users/1"),
                (Method::DELETE, "/users/1"),
                (Method::POST, "/users"),
            ]
        );
    }
}
