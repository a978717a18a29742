//! Filter panel state: which inputs exist, their draft values, and when to apply

use std::collections::BTreeMap;

use super::filters::{FilterCriteria, FilterKey, FilterPatch};
use crate::catalog;
use crate::models::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    /// Edits are staged until "Apply"; "Clear" resets everything
    ApplyThenClear,
    /// Every edit is applied immediately; "Clear" only shows when something is set
    AutoApply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub key: FilterKey,
    /// Unused for the free-text search input
    pub options: Vec<String>,
}

impl FilterField {
    pub fn text(key: FilterKey) -> Self {
        Self {
            key,
            options: Vec::new(),
        }
    }

    pub fn select(key: FilterKey, options: &[&str]) -> Self {
        Self {
            key,
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.key == FilterKey::Search
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    Apply(FilterPatch),
    Clear,
}

#[derive(Debug, Clone)]
pub struct FilterPanel {
    mode: PanelMode,
    fields: Vec<FilterField>,
    draft: BTreeMap<FilterKey, String>,
    visible: bool,
    focused: usize,
}

impl FilterPanel {
    pub fn new(mode: PanelMode, fields: Vec<FilterField>) -> Self {
        Self {
            mode,
            fields,
            draft: BTreeMap::new(),
            visible: false,
            focused: 0,
        }
    }

    /// Inputs offered for each resource
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Institutions => Self::new(
                PanelMode::AutoApply,
                vec![
                    FilterField::text(FilterKey::Search),
                    FilterField::select(FilterKey::Country, catalog::COUNTRIES),
                    FilterField::select(FilterKey::State, &[]),
                    FilterField::select(FilterKey::Sector, catalog::SECTORS),
                    FilterField::select(FilterKey::Territory, catalog::TERRITORIES),
                    FilterField::select(FilterKey::Group, catalog::GROUPS),
                    FilterField::select(FilterKey::Promoted, catalog::PROMOTED),
                    FilterField::select(FilterKey::Promotion, catalog::YES_NO),
                    FilterField::select(FilterKey::Scholarship, catalog::YES_NO),
                ],
            ),
            ResourceKind::SkillAssessments => Self::new(
                PanelMode::ApplyThenClear,
                vec![
                    FilterField::select(FilterKey::OccupationGroups, &[]),
                    FilterField::select(FilterKey::PathwaysStreams, &[]),
                ],
            ),
            ResourceKind::Insurance | ResourceKind::VisaServices | ResourceKind::Accommodation => {
                Self::new(
                    PanelMode::ApplyThenClear,
                    vec![
                        FilterField::text(FilterKey::Search),
                        FilterField::select(FilterKey::Country, catalog::COUNTRIES),
                    ],
                )
            }
        }
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn value(&self, key: FilterKey) -> &str {
        self.draft.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Fields currently shown. The state select needs a country with known states.
    pub fn visible_fields(&self) -> Vec<&FilterField> {
        let has_states = catalog::states_for(self.value(FilterKey::Country)).is_some();
        self.fields
            .iter()
            .filter(|field| field.key != FilterKey::State || has_states)
            .collect()
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused_field(&self) -> Option<&FilterField> {
        self.visible_fields().get(self.focused).copied()
    }

    pub fn focus_next(&mut self) {
        let count = self.visible_fields().len();
        if count > 0 {
            self.focused = (self.focused + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.visible_fields().len();
        if count > 0 {
            self.focused = (self.focused + count - 1) % count;
        }
    }

    /// Options for a select; the state list depends on the chosen country
    pub fn options_for(&self, field: &FilterField) -> Vec<String> {
        if field.key == FilterKey::State {
            return catalog::states_for(self.value(FilterKey::Country))
                .map(|states| states.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default();
        }
        field.options.clone()
    }

    /// Replace select options loaded at runtime (skill assessment lookups)
    pub fn set_options(&mut self, key: FilterKey, options: Vec<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.options = options;
        }
    }

    /// Change one value. Auto-apply panels return the patch to run right away.
    pub fn set_value(&mut self, key: FilterKey, value: impl Into<String>) -> Option<PanelAction> {
        let value = value.into();
        let mut patch = FilterPatch::new().set(key, value.clone());

        if value.trim().is_empty() {
            self.draft.remove(&key);
        } else {
            self.draft.insert(key, value);
        }

        // A state only makes sense for the country it was picked under
        if key == FilterKey::Country && self.draft.remove(&FilterKey::State).is_some() {
            patch = patch.set(FilterKey::State, "");
        }

        let count = self.visible_fields().len();
        if self.focused >= count {
            self.focused = count.saturating_sub(1);
        }

        match self.mode {
            PanelMode::AutoApply => Some(PanelAction::Apply(patch)),
            PanelMode::ApplyThenClear => None,
        }
    }

    /// Step the focused select through "All" and its options
    pub fn cycle_option(&mut self, forward: bool) -> Option<PanelAction> {
        let field = self.focused_field()?.clone();
        if field.is_text() {
            return None;
        }

        let mut choices = vec![String::new()];
        choices.extend(self.options_for(&field));

        let current = choices
            .iter()
            .position(|choice| choice == self.value(field.key))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else {
            (current + choices.len() - 1) % choices.len()
        };

        self.set_value(field.key, choices[next].clone())
    }

    pub fn push_char(&mut self, c: char) -> Option<PanelAction> {
        let field = self.focused_field()?.clone();
        if !field.is_text() {
            return None;
        }
        let mut value = self.value(field.key).to_string();
        value.push(c);
        self.set_value(field.key, value)
    }

    pub fn pop_char(&mut self) -> Option<PanelAction> {
        let field = self.focused_field()?.clone();
        if !field.is_text() {
            return None;
        }
        let mut value = self.value(field.key).to_string();
        value.pop();
        self.set_value(field.key, value)
    }

    /// Patch carrying every field, so cleared inputs also clear the criteria
    pub fn apply(&self) -> PanelAction {
        let patch = self.fields.iter().fold(FilterPatch::new(), |patch, field| {
            patch.set(field.key, self.value(field.key))
        });
        PanelAction::Apply(patch)
    }

    pub fn clear(&mut self) -> PanelAction {
        self.draft.clear();
        self.focused = 0;
        PanelAction::Clear
    }

    /// Whether a "Clear" affordance is offered for the active criteria
    pub fn shows_clear(&self, criteria: &FilterCriteria, default_page_size: usize) -> bool {
        match self.mode {
            PanelMode::ApplyThenClear => true,
            PanelMode::AutoApply => !criteria.is_default(default_page_size),
        }
    }

    /// Seed the inputs from the criteria currently in effect
    pub fn sync_from(&mut self, criteria: &FilterCriteria) {
        self.draft = criteria
            .iter()
            .filter(|(key, _)| self.fields.iter().any(|f| f.key == *key))
            .map(|(key, value)| (key, value.to_string()))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_select_depends_on_country() {
        let mut panel = FilterPanel::for_kind(ResourceKind::Institutions);
        let has_state = |p: &FilterPanel| p.visible_fields().iter().any(|f| f.key == FilterKey::State);

        assert!(!has_state(&panel));
        panel.set_value(FilterKey::Country, "Australia");
        assert!(has_state(&panel));

        panel.set_value(FilterKey::State, "NSW");
        let action = panel.set_value(FilterKey::Country, "Nepal");
        assert!(!has_state(&panel));
        assert_eq!(panel.value(FilterKey::State), "");
        assert_eq!(
            action,
            Some(PanelAction::Apply(
                FilterPatch::new()
                    .set(FilterKey::Country, "Nepal")
                    .set(FilterKey::State, "")
            ))
        );
    }

    #[test]
    fn test_apply_then_clear_stages_edits() {
        let mut panel = FilterPanel::for_kind(ResourceKind::VisaServices);
        assert_eq!(panel.mode(), PanelMode::ApplyThenClear);
        assert_eq!(panel.set_value(FilterKey::Country, "Canada"), None);

        match panel.apply() {
            PanelAction::Apply(patch) => {
                assert!(patch.values.contains(&(FilterKey::Country, "Canada".to_string())));
                assert!(patch.values.contains(&(FilterKey::Search, String::new())));
            }
            other => panic!("unexpected action: {:?}", other),
        }

        assert_eq!(panel.clear(), PanelAction::Clear);
        assert_eq!(panel.value(FilterKey::Country), "");
    }

    #[test]
    fn test_auto_apply_clear_visibility() {
        let panel = FilterPanel::for_kind(ResourceKind::Institutions);
        let defaults = FilterCriteria::new(15);
        assert!(!panel.shows_clear(&defaults, 15));
        assert!(panel.shows_clear(&defaults.clone().with(FilterKey::Sector, "VET"), 15));

        let staged = FilterPanel::for_kind(ResourceKind::Insurance);
        assert!(staged.shows_clear(&defaults, 15));
    }

    #[test]
    fn test_cycle_and_typing() {
        let mut panel = FilterPanel::for_kind(ResourceKind::Accommodation);
        panel.push_char('s');
        panel.push_char('y');
        assert_eq!(panel.value(FilterKey::Search), "sy");
        panel.pop_char();
        assert_eq!(panel.value(FilterKey::Search), "s");

        panel.focus_next();
        panel.cycle_option(true);
        assert_eq!(panel.value(FilterKey::Country), catalog::COUNTRIES[0]);
        panel.cycle_option(false);
        assert_eq!(panel.value(FilterKey::Country), "");
    }

    #[test]
    fn test_skill_assessment_panel_only_offers_server_filters() {
        let panel = FilterPanel::for_kind(ResourceKind::SkillAssessments);
        let keys: Vec<FilterKey> = panel.visible_fields().iter().map(|f| f.key).collect();
        assert_eq!(keys, vec![FilterKey::OccupationGroups, FilterKey::PathwaysStreams]);
    }

    #[test]
    fn test_runtime_options_and_sync() {
        let mut panel = FilterPanel::for_kind(ResourceKind::SkillAssessments);
        panel.set_options(FilterKey::OccupationGroups, vec!["Engineering".to_string()]);
        panel.cycle_option(true);
        assert_eq!(panel.value(FilterKey::OccupationGroups), "Engineering");

        panel.sync_from(&FilterCriteria::new(15).with(FilterKey::PathwaysStreams, "General"));
        assert_eq!(panel.value(FilterKey::OccupationGroups), "");
        assert_eq!(panel.value(FilterKey::PathwaysStreams), "General");
    }
}
