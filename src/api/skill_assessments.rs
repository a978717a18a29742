//! Skill assessments, the only resource paged by the backend

use tracing::warn;

use super::client::{ApiClient, Query};
use super::endpoints;
use super::error::ApiResult;
use super::service::{ResourceSpec, RestResource};
use crate::models::{SkillAssessment, SkillAssessmentDraft};
use crate::state::filters::{FilterKey, Paging};

pub static SKILL_ASSESSMENTS: ResourceSpec = ResourceSpec {
    base_path: endpoints::skill_assessment::BASE,
    singular: "skill assessment",
    plural: "skill assessments",
    server_keys: &[FilterKey::OccupationGroups, FilterKey::PathwaysStreams],
    paging: Paging::Server,
};

pub type SkillAssessments = RestResource<SkillAssessment, SkillAssessmentDraft>;

pub fn skill_assessments(client: ApiClient) -> SkillAssessments {
    RestResource::new(client, &SKILL_ASSESSMENTS)
}

/// Distinct values used to populate the filter selects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillAssessmentLookups {
    pub occupation_groups: Vec<String>,
    pub pathways_streams: Vec<String>,
}

impl RestResource<SkillAssessment, SkillAssessmentDraft> {
    pub async fn occupation_groups(&self) -> ApiResult<Vec<String>> {
        self.client()
            .get(
                endpoints::skill_assessment::OCCUPATION_GROUPS,
                &Query::new(),
                "Failed to fetch occupation groups",
            )
            .await
    }

    pub async fn pathways_streams(&self) -> ApiResult<Vec<String>> {
        self.client()
            .get(
                endpoints::skill_assessment::PATHWAYS_STREAMS,
                &Query::new(),
                "Failed to fetch pathways/streams",
            )
            .await
    }

    /// Both lookups. Failures only leave the corresponding list empty.
    pub async fn lookups(&self) -> SkillAssessmentLookups {
        let occupation_groups = self.occupation_groups().await.unwrap_or_else(|e| {
            warn!("Failed to load occupation groups: {}", e);
            Vec::new()
        });
        let pathways_streams = self.pathways_streams().await.unwrap_or_else(|e| {
            warn!("Failed to load pathways/streams: {}", e);
            Vec::new()
        });

        SkillAssessmentLookups {
            occupation_groups,
            pathways_streams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::ListSource;
    use crate::config::Config;
    use crate::state::filters::FilterCriteria;

    #[test]
    fn test_query_carries_filters_and_paging() {
        let service = skill_assessments(ApiClient::new(&Config::default()).unwrap());
        let criteria = FilterCriteria::new(15)
            .with(FilterKey::PathwaysStreams, "General Stream")
            .with(FilterKey::Country, "Australia");

        assert_eq!(
            service.query_for(&criteria),
            vec![
                ("pathwaysStreams".to_string(), "General Stream".to_string()),
                ("page".to_string(), "1".to_string()),
                ("pageSize".to_string(), "15".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_lookup_failures_are_swallowed() {
        // Nothing listens on port 9; both calls fail at the transport level.
        let config = Config {
            api_url: "http://127.0.0.1:9/api".to_string(),
            ..Config::default()
        };
        let service = skill_assessments(ApiClient::new(&config).unwrap());
        assert_eq!(service.lookups().await, SkillAssessmentLookups::default());
    }
}
