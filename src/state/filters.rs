//! Filter criteria shared by every resource list

use std::collections::BTreeMap;
use std::fmt;

use crate::api::client::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Search,
    Country,
    State,
    Sector,
    Territory,
    Group,
    Promoted,
    /// "100% promotion" yes/no
    Promotion,
    Scholarship,
    OccupationGroups,
    PathwaysStreams,
}

impl FilterKey {
    /// Query parameter name understood by the backend
    pub fn as_param(&self) -> &'static str {
        match self {
            FilterKey::Search => "search",
            FilterKey::Country => "country",
            FilterKey::State => "state",
            FilterKey::Sector => "sector",
            FilterKey::Territory => "territory",
            FilterKey::Group => "group",
            FilterKey::Promoted => "promoted",
            FilterKey::Promotion => "promotion",
            FilterKey::Scholarship => "scholarship",
            FilterKey::OccupationGroups => "occupationGroups",
            FilterKey::PathwaysStreams => "pathwaysStreams",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterKey::Search => "Search",
            FilterKey::Country => "Country",
            FilterKey::State => "State",
            FilterKey::Sector => "Sector",
            FilterKey::Territory => "Territory",
            FilterKey::Group => "Group",
            FilterKey::Promoted => "Promoted",
            FilterKey::Promotion => "100% Promotion",
            FilterKey::Scholarship => "Scholarship",
            FilterKey::OccupationGroups => "Occupation Groups",
            FilterKey::PathwaysStreams => "Pathways/Streams",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Whether page/page size are sent to the backend or only cap the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    Server,
    Display,
}

/// Current set of list-narrowing parameters plus pagination.
///
/// Empty values are never stored, so "no key" and "blank" mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    values: BTreeMap<FilterKey, String>,
    pub page: usize,
    pub page_size: usize,
}

impl FilterCriteria {
    pub fn new(page_size: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            page: 1,
            page_size,
        }
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value.trim().to_string());
        }
    }

    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn has_active_filters(&self) -> bool {
        !self.values.is_empty()
    }

    /// True when nothing differs from a freshly cleared state
    pub fn is_default(&self, default_page_size: usize) -> bool {
        self.values.is_empty() && self.page == 1 && self.page_size == default_page_size
    }

    /// Merge a partial update. Unspecified keys keep their value, page returns to 1.
    pub fn merge(&mut self, patch: &FilterPatch) {
        for (key, value) in &patch.values {
            self.set(*key, value.clone());
        }
        if let Some(page_size) = patch.page_size {
            self.page_size = page_size;
        }
        self.page = 1;
    }

    /// Parameters to send for the given server-side keys
    pub fn query(&self, server_keys: &[FilterKey], paging: Paging) -> Query {
        let mut query: Query = self
            .iter()
            .filter(|(key, _)| server_keys.contains(key))
            .map(|(key, value)| (key.as_param().to_string(), value.to_string()))
            .collect();

        if paging == Paging::Server {
            query.push(("page".to_string(), self.page.to_string()));
            query.push(("pageSize".to_string(), self.page_size.to_string()));
        }

        query
    }

    /// Criteria the backend does not handle and must be applied locally
    pub fn client_side<'a>(
        &'a self,
        server_keys: &'a [FilterKey],
    ) -> impl Iterator<Item = (FilterKey, &'a str)> + 'a {
        self.iter().filter(move |(key, _)| !server_keys.contains(key))
    }
}

/// Partial criteria update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub values: Vec<(FilterKey, String)>,
    pub page_size: Option<usize>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.values.push((key, value.into()));
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unspecified_and_resets_page() {
        let mut criteria = FilterCriteria::new(15).with(FilterKey::Sector, "Engineering");
        criteria.page = 3;

        criteria.merge(&FilterPatch::new().set(FilterKey::Country, "Australia"));

        assert_eq!(criteria.get(FilterKey::Sector), Some("Engineering"));
        assert_eq!(criteria.get(FilterKey::Country), Some("Australia"));
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.page_size, 15);
    }

    #[test]
    fn test_blank_value_removes_key() {
        let mut criteria = FilterCriteria::new(15).with(FilterKey::Country, "Canada");
        criteria.merge(&FilterPatch::new().set(FilterKey::Country, "  "));
        assert!(!criteria.has_active_filters());
        assert!(criteria.is_default(15));
    }

    #[test]
    fn test_query_for_server_paging() {
        let mut criteria = FilterCriteria::new(25)
            .with(FilterKey::OccupationGroups, "Engineering")
            .with(FilterKey::Search, "civil");
        criteria.page = 2;

        let query = criteria.query(
            &[FilterKey::OccupationGroups, FilterKey::PathwaysStreams],
            Paging::Server,
        );
        assert_eq!(
            query,
            vec![
                ("occupationGroups".to_string(), "Engineering".to_string()),
                ("page".to_string(), "2".to_string()),
                ("pageSize".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_client_side_excludes_server_keys() {
        let criteria = FilterCriteria::new(15)
            .with(FilterKey::Country, "Australia")
            .with(FilterKey::Search, "allianz");
        let local: Vec<_> = criteria.client_side(&[FilterKey::Country]).collect();
        assert_eq!(local, vec![(FilterKey::Search, "allianz")]);

        let query = criteria.query(&[FilterKey::Country], Paging::Display);
        assert_eq!(query, vec![("country".to_string(), "Australia".to_string())]);
    }
}
