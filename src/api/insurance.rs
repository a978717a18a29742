//! Health insurance providers

use super::client::ApiClient;
use super::endpoints;
use super::service::{ResourceSpec, RestResource};
use crate::models::{HealthInsurance, HealthInsuranceDraft};
use crate::state::filters::{FilterKey, Paging};

pub static HEALTH_INSURANCE: ResourceSpec = ResourceSpec {
    base_path: endpoints::insurance::BASE,
    singular: "health insurance",
    plural: "health insurances",
    server_keys: &[FilterKey::Country],
    paging: Paging::Display,
};

pub type HealthInsurances = RestResource<HealthInsurance, HealthInsuranceDraft>;

pub fn health_insurances(client: ApiClient) -> HealthInsurances {
    RestResource::new(client, &HEALTH_INSURANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::ListSource;
    use crate::config::Config;
    use crate::state::filters::FilterCriteria;

    #[test]
    fn test_empty_criteria_send_no_query() {
        let service = health_insurances(ApiClient::new(&Config::default()).unwrap());
        assert!(service.query_for(&FilterCriteria::new(50)).is_empty());
        assert_eq!(service.spec().update_failed(), "Failed to update health insurance");
    }
}
