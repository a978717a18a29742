//! Visa services

use super::client::ApiClient;
use super::endpoints;
use super::service::{ResourceSpec, RestResource};
use crate::models::{VisaService, VisaServiceDraft};
use crate::state::filters::{FilterKey, Paging};

pub static VISA_SERVICES: ResourceSpec = ResourceSpec {
    base_path: endpoints::visa::BASE,
    singular: "visa service",
    plural: "visa services",
    server_keys: &[FilterKey::Country],
    paging: Paging::Display,
};

pub type VisaServices = RestResource<VisaService, VisaServiceDraft>;

pub fn visa_services(client: ApiClient) -> VisaServices {
    RestResource::new(client, &VISA_SERVICES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::ListSource;
    use crate::config::Config;
    use crate::state::filters::FilterCriteria;

    #[test]
    fn test_only_country_goes_to_the_server() {
        let service = visa_services(ApiClient::new(&Config::default()).unwrap());
        let criteria = FilterCriteria::new(15)
            .with(FilterKey::Country, "Australia")
            .with(FilterKey::Search, "student");

        assert_eq!(
            service.query_for(&criteria),
            vec![("country".to_string(), "Australia".to_string())]
        );
    }
}
