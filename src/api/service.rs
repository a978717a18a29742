//! Service traits and the generic REST-backed implementation

use async_trait::async_trait;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{debug, info};

use super::client::{ApiClient, Query};
use super::endpoints;
use super::error::ApiResult;
use crate::models::Resource;
use crate::state::filters::{FilterCriteria, FilterKey, Paging};

/// One fetched page plus the backend's `count`, when it sends one
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<E> {
    pub items: Vec<E>,
    pub count: Option<u64>,
}

/// Anything that can produce a filtered collection of one resource
#[async_trait]
pub trait ListSource: Send + Sync {
    type Entity: Resource;

    /// Criteria the backend applies itself; the rest is filtered locally
    fn server_keys(&self) -> &'static [FilterKey];

    fn paging(&self) -> Paging;

    fn query_for(&self, criteria: &FilterCriteria) -> Query {
        criteria.query(self.server_keys(), self.paging())
    }

    async fn list(&self, criteria: &FilterCriteria) -> ApiResult<Vec<Self::Entity>>;

    /// Like `list`, keeping the envelope count for server-paged totals
    async fn list_page(&self, criteria: &FilterCriteria) -> ApiResult<Listing<Self::Entity>> {
        let items = self.list(criteria).await?;
        Ok(Listing { items, count: None })
    }
}

/// Full CRUD over one resource
#[async_trait]
pub trait ResourceService: ListSource {
    type Draft: Serialize + Send + Sync;

    async fn get(&self, id: &str) -> ApiResult<Self::Entity>;

    async fn create(&self, draft: &Self::Draft) -> ApiResult<Self::Entity>;

    async fn update(&self, id: &str, draft: &Self::Draft) -> ApiResult<Self::Entity>;

    async fn delete(&self, id: &str) -> ApiResult<()>;
}

/// Path and behaviour description of a REST resource
#[derive(Debug)]
pub struct ResourceSpec {
    pub base_path: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    pub server_keys: &'static [FilterKey],
    pub paging: Paging,
}

impl ResourceSpec {
    pub fn list_failed(&self) -> String {
        format!("Failed to fetch {}", self.plural)
    }

    pub fn get_failed(&self) -> String {
        format!("Failed to fetch {}", self.singular)
    }

    pub fn create_failed(&self) -> String {
        format!("Failed to create {}", self.singular)
    }

    pub fn update_failed(&self) -> String {
        format!("Failed to update {}", self.singular)
    }

    pub fn delete_failed(&self) -> String {
        format!("Failed to delete {}", self.singular)
    }
}

/// `GET base`, `GET base/:id`, `POST base`, `PUT base/:id`, `DELETE base/:id`
pub struct RestResource<E, D> {
    client: ApiClient,
    spec: &'static ResourceSpec,
    _marker: PhantomData<fn() -> (E, D)>,
}

impl<E, D> RestResource<E, D> {
    pub fn new(client: ApiClient, spec: &'static ResourceSpec) -> Self {
        Self {
            client,
            spec,
            _marker: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn spec(&self) -> &'static ResourceSpec {
        self.spec
    }
}

impl<E, D> Clone for RestResource<E, D> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone(), self.spec)
    }
}

#[async_trait]
impl<E, D> ListSource for RestResource<E, D>
where
    E: Resource,
    D: Serialize + Send + Sync + 'static,
{
    type Entity = E;

    fn server_keys(&self) -> &'static [FilterKey] {
        self.spec.server_keys
    }

    fn paging(&self) -> Paging {
        self.spec.paging
    }

    async fn list(&self, criteria: &FilterCriteria) -> ApiResult<Vec<E>> {
        Ok(self.list_page(criteria).await?.items)
    }

    async fn list_page(&self, criteria: &FilterCriteria) -> ApiResult<Listing<E>> {
        let query = self.query_for(criteria);
        debug!("Listing {} with {:?}", self.spec.plural, query);

        let envelope = self
            .client
            .get_envelope::<Vec<E>>(self.spec.base_path, &query, &self.spec.list_failed())
            .await?;
        let count = envelope.count;
        let items = envelope.into_data(self.spec.base_path)?;

        info!("Fetched {} {} (count {:?})", items.len(), self.spec.plural, count);
        Ok(Listing { items, count })
    }
}

#[async_trait]
impl<E, D> ResourceService for RestResource<E, D>
where
    E: Resource,
    D: Serialize + Send + Sync + 'static,
{
    type Draft = D;

    async fn get(&self, id: &str) -> ApiResult<E> {
        let path = endpoints::item(self.spec.base_path, id);
        self.client
            .get(&path, &Query::new(), &self.spec.get_failed())
            .await
    }

    async fn create(&self, draft: &D) -> ApiResult<E> {
        let created: E = self
            .client
            .post(self.spec.base_path, draft, &self.spec.create_failed())
            .await?;
        info!("Created {} {}", self.spec.singular, created.id());
        Ok(created)
    }

    async fn update(&self, id: &str, draft: &D) -> ApiResult<E> {
        let path = endpoints::item(self.spec.base_path, id);
        let updated: E = self
            .client
            .put(&path, draft, &self.spec.update_failed())
            .await?;
        info!("Updated {} {}", self.spec.singular, id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        let path = endpoints::item(self.spec.base_path, id);
        self.client.delete(&path, &self.spec.delete_failed()).await?;
        info!("Deleted {} {}", self.spec.singular, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::skill_assessments::SKILL_ASSESSMENTS;
    use crate::api::visa::VISA_SERVICES;

    #[test]
    fn test_fallback_messages() {
        assert_eq!(SKILL_ASSESSMENTS.list_failed(), "Failed to fetch skill assessments");
        assert_eq!(SKILL_ASSESSMENTS.get_failed(), "Failed to fetch skill assessment");
        assert_eq!(VISA_SERVICES.delete_failed(), "Failed to delete visa service");
    }
}
