//! Collection state for one resource: fetch, filter, page, mutate

use tracing::{info, warn};

use super::filters::{FilterCriteria, FilterPatch, Paging};
use super::notice::StatusMessage;
use crate::api::{ListSource, ResourceService};
use crate::models::{Resource, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Holds the last full fetch for the current criteria.
///
/// The collection is never patched locally: every successful mutation is
/// followed by a fresh `list()` call.
pub struct ResourceList<S: ListSource> {
    service: S,
    items: Vec<S::Entity>,
    /// Envelope count from the last fetch
    count: Option<u64>,
    state: LoadState,
    criteria: FilterCriteria,
    default_page_size: usize,
    notices: Vec<StatusMessage>,
}

impl<S: ListSource> ResourceList<S> {
    pub fn new(service: S, default_page_size: usize) -> Self {
        Self {
            service,
            items: Vec::new(),
            count: None,
            state: LoadState::Idle,
            criteria: FilterCriteria::new(default_page_size),
            default_page_size,
            notices: Vec::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn kind(&self) -> ResourceKind {
        S::Entity::KIND
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    pub fn paging(&self) -> Paging {
        self.service.paging()
    }

    /// Everything returned by the last fetch
    pub fn items(&self) -> &[S::Entity] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&S::Entity> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Fetched items narrowed by the criteria the backend does not apply (AND)
    pub fn filtered(&self) -> Vec<&S::Entity> {
        let server_keys = self.service.server_keys();
        self.items
            .iter()
            .filter(|item| {
                self.criteria
                    .client_side(server_keys)
                    .all(|(key, value)| item.matches(key, value))
            })
            .collect()
    }

    /// Rows for the current page
    pub fn visible(&self) -> Vec<&S::Entity> {
        let filtered = self.filtered();
        let page_size = self.criteria.page_size.max(1);

        match self.paging() {
            Paging::Server => filtered.into_iter().take(page_size).collect(),
            Paging::Display => {
                let start = (self.criteria.page.max(1) - 1) * page_size;
                filtered.into_iter().skip(start).take(page_size).collect()
            }
        }
    }

    /// Backend record count for server-paged lists. Only trusted when it
    /// exceeds the rows paged through so far; some endpoints send the page length.
    fn server_total(&self) -> Option<usize> {
        if self.paging() != Paging::Server {
            return None;
        }
        let count = usize::try_from(self.count?).ok()?;
        let seen = (self.criteria.page.max(1) - 1) * self.criteria.page_size + self.items.len();
        (count > seen).then_some(count)
    }

    /// Matching records across all pages, as far as they are known
    pub fn total_records(&self) -> usize {
        self.server_total().unwrap_or_else(|| self.filtered().len())
    }

    pub fn total_pages(&self) -> usize {
        match self.paging() {
            Paging::Server => match self.server_total() {
                Some(total) => total
                    .div_ceil(self.criteria.page_size.max(1))
                    .max(self.criteria.page),
                None => self.criteria.page,
            },
            Paging::Display => {
                let page_size = self.criteria.page_size.max(1);
                self.filtered().len().div_ceil(page_size).max(1)
            }
        }
    }

    pub fn has_next_page(&self) -> bool {
        match self.paging() {
            Paging::Server if self.server_total().is_some() => true,
            // A full page suggests there is more
            Paging::Server => self.items.len() >= self.criteria.page_size,
            Paging::Display => self.criteria.page < self.total_pages(),
        }
    }

    pub fn has_prev_page(&self) -> bool {
        self.criteria.page > 1
    }

    /// "Showing X of Y institutions"
    pub fn summary(&self) -> String {
        let total = self.total_records();
        let shown = self.visible().len();
        format!("Showing {} of {} {}", shown, total, self.kind().noun(total))
    }

    pub fn notify(&mut self, message: StatusMessage) {
        self.notices.push(message);
    }

    pub fn take_notices(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.notices)
    }

    /// Mark the list as loading so the next frame can show it
    pub fn begin_loading(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Re-run `list()` for the current criteria.
    pub async fn refresh(&mut self) -> bool {
        self.state = LoadState::Loading;

        match self.service.list_page(&self.criteria).await {
            Ok(listing) => {
                let loaded = listing.items.len();
                info!("Loaded {} {}", loaded, self.kind().noun(loaded));
                self.items = listing.items;
                self.count = listing.count;
                self.state = LoadState::Loaded;
                // A mutation may have emptied the last display page
                if self.paging() == Paging::Display {
                    self.criteria.page = self.criteria.page.clamp(1, self.total_pages());
                }
                true
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Failed to load {}: {}", self.kind().plural(), message);
                self.state = LoadState::Error(message.clone());
                self.notify(StatusMessage::error(message));
                false
            }
        }
    }

    pub async fn update_filters(&mut self, patch: &FilterPatch) -> bool {
        self.criteria.merge(patch);
        self.refresh().await
    }

    pub async fn clear_filters(&mut self) -> bool {
        self.criteria = FilterCriteria::new(self.default_page_size);
        self.refresh().await
    }

    /// Move to a page. Only server-paged resources fetch again.
    pub async fn set_page(&mut self, page: usize) -> bool {
        match self.paging() {
            Paging::Server => {
                self.criteria.page = page.max(1);
                self.refresh().await
            }
            Paging::Display => {
                self.criteria.page = page.clamp(1, self.total_pages());
                true
            }
        }
    }

    pub async fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.set_page(self.criteria.page + 1).await
    }

    pub async fn prev_page(&mut self) -> bool {
        if !self.has_prev_page() {
            return false;
        }
        self.set_page(self.criteria.page - 1).await
    }

    pub async fn set_page_size(&mut self, page_size: usize) -> bool {
        self.criteria.page_size = page_size.max(1);
        self.criteria.page = 1;
        match self.paging() {
            Paging::Server => self.refresh().await,
            Paging::Display => true,
        }
    }
}

impl<S: ResourceService> ResourceList<S> {
    /// Fresh copy of a single record; failures become a notice.
    pub async fn fetch_one(&mut self, id: &str) -> Option<S::Entity> {
        match self.service.get(id).await {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!("Failed to fetch {} {}: {}", self.kind().singular(), id, e);
                self.notify(StatusMessage::error(e.to_string()));
                None
            }
        }
    }

    pub async fn create(&mut self, draft: &S::Draft) -> bool {
        match self.service.create(draft).await {
            Ok(_) => {
                let message = format!("{} created successfully", capitalize(self.kind().singular()));
                self.notify(StatusMessage::success(message));
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!("Failed to create {}: {}", self.kind().singular(), e);
                self.notify(StatusMessage::error(e.to_string()));
                false
            }
        }
    }

    pub async fn update(&mut self, id: &str, draft: &S::Draft) -> bool {
        match self.service.update(id, draft).await {
            Ok(_) => {
                let message = format!("{} updated successfully", capitalize(self.kind().singular()));
                self.notify(StatusMessage::success(message));
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!("Failed to update {} {}: {}", self.kind().singular(), id, e);
                self.notify(StatusMessage::error(e.to_string()));
                false
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        match self.service.delete(id).await {
            Ok(()) => {
                let message = format!("{} deleted successfully", capitalize(self.kind().singular()));
                self.notify(StatusMessage::success(message));
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!("Failed to delete {} {}: {}", self.kind().singular(), id, e);
                self.notify(StatusMessage::error(e.to_string()));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillAssessment;
    use crate::state::filters::FilterKey;
    use crate::state::testing::{assessment, FakeSkillAssessments};

    fn seed() -> Vec<SkillAssessment> {
        vec![
            assessment("1", "Engineering Professionals", "General Stream"),
            assessment("2", "Health Professionals", "General Stream"),
            assessment("3", "ICT Professionals", "Priority Stream"),
        ]
    }

    fn seeded() -> FakeSkillAssessments {
        FakeSkillAssessments::with_items(seed())
    }

    #[tokio::test]
    async fn test_refresh_transitions_to_loaded() {
        let mut list = ResourceList::new(seeded(), 15);
        assert_eq!(list.state(), &LoadState::Idle);

        assert!(list.refresh().await);
        assert_eq!(list.state(), &LoadState::Loaded);
        assert_eq!(list.items().len(), 3);
        assert_eq!(list.summary(), "Showing 3 of 3 skill assessments");
    }

    #[tokio::test]
    async fn test_failed_fetch_records_error_and_keeps_items() {
        let service = seeded();
        let mut list = ResourceList::new(service.clone(), 15);
        list.refresh().await;

        service.fail_next("Failed to fetch skill assessments");
        assert!(!list.refresh().await);

        assert_eq!(list.error(), Some("Failed to fetch skill assessments"));
        assert_eq!(list.items().len(), 3);
        let notices = list.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
        assert!(list.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_update_filters_query_reflects_merged_criteria() {
        let service = seeded();
        let mut list = ResourceList::new(service.clone(), 15);
        list.update_filters(&FilterPatch::new().set(FilterKey::PathwaysStreams, "General Stream"))
            .await;
        list.set_page(3).await;

        list.update_filters(&FilterPatch::new().set(FilterKey::OccupationGroups, "Engineering Professionals"))
            .await;

        assert_eq!(
            service.last_query(),
            Some(vec![
                ("occupationGroups".to_string(), "Engineering Professionals".to_string()),
                ("pathwaysStreams".to_string(), "General Stream".to_string()),
                ("page".to_string(), "1".to_string()),
                ("pageSize".to_string(), "15".to_string()),
            ])
        );
        assert_eq!(list.items().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_filters_restores_defaults() {
        let service = seeded();
        let mut list = ResourceList::new(service.clone(), 15);
        list.update_filters(&FilterPatch::new().set(FilterKey::OccupationGroups, "Health Professionals").page_size(50))
            .await;
        list.set_page(2).await;

        list.clear_filters().await;

        assert_eq!(list.criteria(), &FilterCriteria::new(15));
        assert_eq!(
            service.last_query(),
            Some(vec![
                ("page".to_string(), "1".to_string()),
                ("pageSize".to_string(), "15".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn test_delete_refetches_backend_truth() {
        let service = seeded();
        let mut list = ResourceList::new(service.clone(), 15);
        list.refresh().await;
        let fetches = service.list_calls();

        assert!(list.delete("2").await);

        assert_eq!(service.list_calls(), fetches + 1);
        assert!(list.find("2").is_none());
        assert_eq!(list.items().len(), 2);
        assert_eq!(
            list.take_notices()[0].message,
            "Skill assessment deleted successfully"
        );
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_collection() {
        let service = seeded();
        let mut list = ResourceList::new(service.clone(), 15);
        list.refresh().await;
        let fetches = service.list_calls();

        service.fail_next("Skill assessment not found");
        assert!(!list.delete("9").await);

        assert_eq!(service.list_calls(), fetches);
        assert_eq!(list.items().len(), 3);
        assert_eq!(list.take_notices()[0].message, "Skill assessment not found");
    }

    #[tokio::test]
    async fn test_re_applying_same_criteria_does_not_duplicate_rows() {
        let mut list = ResourceList::new(seeded(), 15);
        let patch = FilterPatch::new().set(FilterKey::PathwaysStreams, "General Stream");
        list.update_filters(&patch).await;
        list.update_filters(&patch).await;
        assert_eq!(list.visible().len(), 2);
    }

    #[tokio::test]
    async fn test_client_side_search_is_anded_with_server_filters() {
        let service = FakeSkillAssessments::display_paged(seed());
        let mut list = ResourceList::new(service, 15);
        list.update_filters(
            &FilterPatch::new()
                .set(FilterKey::PathwaysStreams, "General Stream")
                .set(FilterKey::Search, "health"),
        )
        .await;
        let visible = list.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "2");
    }

    fn numbered(count: usize) -> Vec<SkillAssessment> {
        (0..count)
            .map(|i| assessment(&i.to_string(), "ICT Professionals", "General Stream"))
            .collect()
    }

    #[tokio::test]
    async fn test_display_paging_slices_without_fetching() {
        let service = FakeSkillAssessments::display_paged(numbered(16));
        let mut list = ResourceList::new(service.clone(), 15);
        list.refresh().await;
        let fetches = service.list_calls();

        assert_eq!(list.total_pages(), 2);
        assert_eq!(list.visible().len(), 15);
        assert!(list.has_next_page());

        assert!(list.next_page().await);
        assert_eq!(list.criteria().page, 2);
        assert_eq!(list.visible().len(), 1);
        assert_eq!(list.visible()[0].id, "15");
        assert!(!list.next_page().await);

        list.set_page(9).await;
        assert_eq!(list.criteria().page, 2);

        list.set_page_size(25).await;
        assert_eq!(list.criteria().page, 1);
        assert_eq!(list.total_pages(), 1);
        assert_eq!(list.visible().len(), 16);

        assert_eq!(service.list_calls(), fetches);
    }

    #[tokio::test]
    async fn test_page_is_clamped_when_last_page_empties() {
        let service = FakeSkillAssessments::display_paged(numbered(16));
        let mut list = ResourceList::new(service, 15);
        list.refresh().await;
        list.next_page().await;

        assert!(list.delete("15").await);

        assert_eq!(list.criteria().page, 1);
        assert_eq!(list.total_pages(), 1);
        assert_eq!(list.visible().len(), 15);
        assert_eq!(list.summary(), "Showing 15 of 15 skill assessments");
    }

    #[tokio::test]
    async fn test_server_count_drives_totals() {
        let service = FakeSkillAssessments::with_items(numbered(40));
        service.send_total_count();
        let mut list = ResourceList::new(service.clone(), 15);
        list.refresh().await;

        assert_eq!(list.total_pages(), 3);
        assert!(list.has_next_page());
        assert_eq!(list.summary(), "Showing 15 of 40 skill assessments");

        list.set_page(3).await;
        assert_eq!(list.items().len(), 10);
        assert_eq!(list.total_pages(), 3);
        assert!(!list.has_next_page());
    }
}
