//! Accommodation partners (read-only listing)

use async_trait::async_trait;
use tracing::info;

use super::client::ApiClient;
use super::endpoints;
use super::error::ApiResult;
use super::service::ListSource;
use crate::models::Accommodation;
use crate::state::filters::{FilterCriteria, FilterKey, Paging};

#[derive(Debug, Clone)]
pub struct AccommodationService {
    client: ApiClient,
}

impl AccommodationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListSource for AccommodationService {
    type Entity = Accommodation;

    fn server_keys(&self) -> &'static [FilterKey] {
        &[]
    }

    fn paging(&self) -> Paging {
        Paging::Display
    }

    async fn list(&self, criteria: &FilterCriteria) -> ApiResult<Vec<Accommodation>> {
        let items: Vec<Accommodation> = self
            .client
            .get(
                endpoints::accommodation::BASE,
                &self.query_for(criteria),
                "Failed to fetch accommodations",
            )
            .await?;
        info!("Fetched {} accommodations", items.len());
        Ok(items)
    }
}
