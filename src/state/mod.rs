//! UI-independent state: list collections, filters, expansion, forms

pub mod expansion;
pub mod filters;
pub mod form;
pub mod list;
pub mod notice;
pub mod panel;

pub use expansion::ExpandedRows;
pub use filters::{FilterCriteria, FilterKey, FilterPatch, Paging};
pub use form::{submit_form, EntityForm, FormMode};
pub use list::{LoadState, ResourceList};
pub use notice::{StatusMessage, StatusType};
pub use panel::{FilterField, FilterPanel, PanelAction, PanelMode};

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory service used by the state and screen tests

    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    use crate::api::{ApiError, ApiResult, ListSource, Listing, Query, ResourceService};
    use crate::models::{Resource, SkillAssessment, SkillAssessmentDraft};
    use crate::state::filters::{FilterCriteria, FilterKey, Paging};

    pub fn assessment(id: &str, group: &str, stream: &str) -> SkillAssessment {
        SkillAssessment {
            id: id.to_string(),
            occupation_groups: group.to_string(),
            pathways_streams: stream.to_string(),
            standard_fee_aud: None,
            priority_fee_aud: None,
            standard_processing_time: None,
            priority_processing_time: None,
            priority_available: None,
            documents_checklist: None,
            official_link: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[derive(Default)]
    struct Inner {
        items: Vec<SkillAssessment>,
        queries: Vec<Query>,
        calls: Vec<String>,
        fail_next: Option<String>,
        next_id: usize,
        sends_count: bool,
    }

    #[derive(Clone, Default)]
    pub struct FakeSkillAssessments {
        inner: Arc<Mutex<Inner>>,
        display_paged: bool,
    }

    impl FakeSkillAssessments {
        pub fn with_items(items: Vec<SkillAssessment>) -> Self {
            let fake = Self::default();
            fake.inner.lock().unwrap().items = items;
            fake
        }

        /// Returns every match at once and leaves paging to the list
        pub fn display_paged(items: Vec<SkillAssessment>) -> Self {
            Self {
                display_paged: true,
                ..Self::with_items(items)
            }
        }

        /// Put the number of matching records in the envelope count
        pub fn send_total_count(&self) {
            self.inner.lock().unwrap().sends_count = true;
        }

        pub fn fail_next(&self, message: &str) {
            self.inner.lock().unwrap().fail_next = Some(message.to_string());
        }

        pub fn list_calls(&self) -> usize {
            self.inner.lock().unwrap().queries.len()
        }

        pub fn last_query(&self) -> Option<Query> {
            self.inner.lock().unwrap().queries.last().cloned()
        }

        /// Mutating calls in order, e.g. `create`, `update:1`, `delete:2`
        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().unwrap().calls.clone()
        }

        fn matching(&self, criteria: &FilterCriteria) -> Vec<SkillAssessment> {
            let inner = self.inner.lock().unwrap();
            inner
                .items
                .iter()
                .filter(|item| {
                    criteria
                        .iter()
                        .filter(|(key, _)| self.server_keys().contains(key))
                        .all(|(key, value)| item.matches(key, value))
                })
                .cloned()
                .collect()
        }

        fn take_failure(&self) -> ApiResult<()> {
            match self.inner.lock().unwrap().fail_next.take() {
                Some(message) => Err(ApiError::service(500, message)),
                None => Ok(()),
            }
        }
    }

    fn from_draft(id: String, draft: &SkillAssessmentDraft) -> SkillAssessment {
        let mut entity = assessment(&id, &draft.occupation_groups, &draft.pathways_streams);
        entity.standard_fee_aud = Some(draft.standard_fee_aud.clone());
        entity
    }

    #[async_trait]
    impl ListSource for FakeSkillAssessments {
        type Entity = SkillAssessment;

        fn server_keys(&self) -> &'static [FilterKey] {
            &[FilterKey::OccupationGroups, FilterKey::PathwaysStreams]
        }

        fn paging(&self) -> Paging {
            if self.display_paged {
                Paging::Display
            } else {
                Paging::Server
            }
        }

        async fn list(&self, criteria: &FilterCriteria) -> ApiResult<Vec<SkillAssessment>> {
            self.take_failure()?;
            let query = self.query_for(criteria);
            self.inner.lock().unwrap().queries.push(query);

            let matching = self.matching(criteria);
            if self.display_paged {
                return Ok(matching);
            }
            let start = (criteria.page.max(1) - 1) * criteria.page_size;
            Ok(matching
                .into_iter()
                .skip(start)
                .take(criteria.page_size)
                .collect())
        }

        async fn list_page(&self, criteria: &FilterCriteria) -> ApiResult<Listing<SkillAssessment>> {
            let items = self.list(criteria).await?;
            let sends_count = self.inner.lock().unwrap().sends_count;
            let count = sends_count.then(|| self.matching(criteria).len() as u64);
            Ok(Listing { items, count })
        }
    }

    #[async_trait]
    impl ResourceService for FakeSkillAssessments {
        type Draft = SkillAssessmentDraft;

        async fn get(&self, id: &str) -> ApiResult<SkillAssessment> {
            self.take_failure()?;
            let inner = self.inner.lock().unwrap();
            inner
                .items
                .iter()
                .find(|item| item.id == id)
                .cloned()
                .ok_or_else(|| ApiError::service(404, "Skill assessment not found"))
        }

        async fn create(&self, draft: &SkillAssessmentDraft) -> ApiResult<SkillAssessment> {
            self.take_failure()?;
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push("create".to_string());
            inner.next_id += 1;
            let entity = from_draft(format!("new-{}", inner.next_id), draft);
            inner.items.push(entity.clone());
            Ok(entity)
        }

        async fn update(&self, id: &str, draft: &SkillAssessmentDraft) -> ApiResult<SkillAssessment> {
            self.take_failure()?;
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(format!("update:{}", id));
            let slot = inner
                .items
                .iter_mut()
                .find(|item| item.id == id)
                .ok_or_else(|| ApiError::service(404, "Skill assessment not found"))?;
            *slot = from_draft(id.to_string(), draft);
            Ok(slot.clone())
        }

        async fn delete(&self, id: &str) -> ApiResult<()> {
            self.take_failure()?;
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(format!("delete:{}", id));
            let before = inner.items.len();
            inner.items.retain(|item| item.id != id);
            if inner.items.len() == before {
                return Err(ApiError::service(404, "Skill assessment not found"));
            }
            Ok(())
        }
    }
}
