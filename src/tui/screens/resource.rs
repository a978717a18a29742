//! Resource list screens: table, filter panel and view modal, plus the CRUD wrapper

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::path::PathBuf;
use tracing::info;

use crate::api::{Institutions, ListSource, ResourceService, SkillAssessments};
use crate::catalog;
use crate::models::{Editable, Resource};
use crate::state::{
    submit_form, EntityForm, ExpandedRows, FilterKey, FilterPanel, PanelAction, PanelMode,
    ResourceList, StatusMessage,
};
use crate::tui::components::{filter_panel, modal, render_table, Tabular};
use crate::tui::traits::{Navigable, Screen, ScreenAction};
use crate::tui::ui::Styles;

const LIST_HELP: &[(&str, &str)] = &[
    ("↑/↓", "Move selection"),
    ("Space / →", "Expand or collapse line items"),
    ("←", "Collapse line items"),
    ("Enter / v", "View details"),
    ("f", "Show or hide filters"),
    ("r", "Refresh"),
    ("PgUp/PgDn", "Previous / next page"),
    ("+", "Cycle rows per page"),
    ("x", "Export spreadsheet (institutions)"),
];

const CRUD_HELP: &[(&str, &str)] = &[
    ("↑/↓", "Move selection"),
    ("Space / →", "Expand or collapse line items"),
    ("←", "Collapse line items"),
    ("Enter / v", "View details"),
    ("a", "Add"),
    ("e", "Edit selected"),
    ("d", "Delete selected (asks first)"),
    ("f", "Show or hide filters"),
    ("r", "Refresh"),
    ("PgUp/PgDn", "Previous / next page"),
    ("+", "Cycle rows per page"),
    ("x", "Export spreadsheet (institutions)"),
];

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Filters,
}

/// Read-only list screen for any resource
pub struct ResourceScreen<S: ListSource> {
    list: ResourceList<S>,
    panel: FilterPanel,
    expanded: ExpandedRows,
    selected: Option<usize>,
    focus: Focus,
    viewing: Option<S::Entity>,
    view_scroll: u16,
    export: Option<(Institutions, PathBuf)>,
    lookups: Option<SkillAssessments>,
    notices: Vec<StatusMessage>,
}

impl<S> ResourceScreen<S>
where
    S: ListSource,
    S::Entity: Tabular,
{
    pub fn new(service: S, page_size: usize) -> Self {
        Self {
            list: ResourceList::new(service, page_size),
            panel: FilterPanel::for_kind(S::Entity::KIND),
            expanded: ExpandedRows::new(),
            selected: None,
            focus: Focus::Table,
            viewing: None,
            view_scroll: 0,
            export: None,
            lookups: None,
            notices: Vec::new(),
        }
    }

    /// Enable `x` to download the spreadsheet export into `dir`
    pub fn with_export(mut self, service: Institutions, dir: PathBuf) -> Self {
        self.export = Some((service, dir));
        self
    }

    /// Populate the occupation group / pathway selects on enter
    pub fn with_lookups(mut self, service: SkillAssessments) -> Self {
        self.lookups = Some(service);
        self
    }

    pub fn list(&self) -> &ResourceList<S> {
        &self.list
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_entity(&self) -> Option<&S::Entity> {
        let index = self.selected?;
        self.list.visible().get(index).copied()
    }

    fn reset_page_state(&mut self) {
        self.expanded.clear();
        self.clamp_selection();
    }

    async fn run_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Apply(patch) => self.list.update_filters(&patch).await,
            PanelAction::Clear => self.list.clear_filters().await,
        };
        self.reset_page_state();
    }

    async fn load_lookups(&mut self) {
        let Some(service) = &self.lookups else {
            return;
        };
        let lookups = service.lookups().await;
        self.panel
            .set_options(FilterKey::OccupationGroups, lookups.occupation_groups);
        self.panel
            .set_options(FilterKey::PathwaysStreams, lookups.pathways_streams);
    }

    async fn export(&mut self) {
        let Some((service, dir)) = &self.export else {
            return;
        };
        let notice = match service.export_to(dir, None).await {
            Ok(path) => StatusMessage::success(format!("Exported to {}", path.display())),
            Err(e) => StatusMessage::error(e.to_string()),
        };
        self.notices.push(notice);
    }

    fn selected_expandable_id(&self) -> Option<String> {
        self.selected_entity()
            .filter(|entity| !entity.line_items().is_empty())
            .map(|entity| entity.id().to_string())
    }

    fn toggle_expanded(&mut self) {
        if let Some(id) = self.selected_expandable_id() {
            self.expanded.toggle(&id);
        }
    }

    fn expand(&mut self) {
        if let Some(id) = self.selected_expandable_id() {
            if !self.expanded.is_expanded(&id) {
                self.expanded.toggle(&id);
            }
        }
    }

    fn collapse(&mut self) {
        if let Some(id) = self.selected_expandable_id() {
            if self.expanded.is_expanded(&id) {
                self.expanded.toggle(&id);
            }
        }
    }

    fn open_view(&mut self) {
        self.viewing = self.selected_entity().cloned();
        self.view_scroll = 0;
    }

    fn handle_view_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('v') => self.viewing = None,
            KeyCode::Up => self.view_scroll = self.view_scroll.saturating_sub(1),
            KeyCode::Down => self.view_scroll = self.view_scroll.saturating_add(1),
            _ => {}
        }
    }

    fn toggle_filters(&mut self) {
        self.panel.toggle_visibility();
        if self.panel.is_visible() {
            self.panel.sync_from(self.list.criteria());
            self.focus = Focus::Filters;
        } else {
            self.focus = Focus::Table;
        }
    }

    /// Keys for the focused filter panel; returns the criteria change to run, if any
    fn handle_filter_key(&mut self, key: KeyEvent) -> Option<PanelAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc | KeyCode::Tab => {
                self.focus = Focus::Table;
                None
            }
            KeyCode::Up => {
                self.panel.focus_prev();
                None
            }
            KeyCode::Down => {
                self.panel.focus_next();
                None
            }
            KeyCode::Left => self.panel.cycle_option(false),
            KeyCode::Right => self.panel.cycle_option(true),
            KeyCode::Enter => match self.panel.mode() {
                PanelMode::ApplyThenClear => Some(self.panel.apply()),
                PanelMode::AutoApply => None,
            },
            KeyCode::Char('l') if ctrl => {
                let criteria = self.list.criteria();
                if self.panel.shows_clear(criteria, self.list.default_page_size()) {
                    Some(self.panel.clear())
                } else {
                    None
                }
            }
            KeyCode::Backspace => self.panel.pop_char(),
            KeyCode::Char(c) if !ctrl => self.panel.push_char(c),
            _ => None,
        }
    }

    async fn handle_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Home => self.navigate_to_first(),
            KeyCode::End => self.navigate_to_last(),
            KeyCode::Char(' ') => self.toggle_expanded(),
            KeyCode::Right => self.expand(),
            KeyCode::Left => self.collapse(),
            KeyCode::Enter | KeyCode::Char('v') => self.open_view(),
            KeyCode::Char('f') => self.toggle_filters(),
            KeyCode::Char('r') => {
                self.list.refresh().await;
                self.reset_page_state();
            }
            KeyCode::PageDown => {
                if self.list.next_page().await {
                    self.selected = Some(0);
                    self.reset_page_state();
                }
            }
            KeyCode::PageUp => {
                if self.list.prev_page().await {
                    self.selected = Some(0);
                    self.reset_page_state();
                }
            }
            KeyCode::Char('+') => {
                let next = catalog::next_page_size(self.list.criteria().page_size);
                self.list.set_page_size(next).await;
                self.reset_page_state();
            }
            KeyCode::Char('x') => self.export().await,
            _ => {}
        }
    }

    fn footer(&self) -> Line<'static> {
        if let Some(error) = self.list.error() {
            return Line::from(Span::styled(error.to_string(), Styles::error()));
        }
        let criteria = self.list.criteria();
        Line::from(vec![
            Span::raw(self.list.summary()),
            Span::styled(
                format!(
                    "  |  Page {} of {}  |  Rows per page: {}",
                    criteria.page,
                    self.list.total_pages(),
                    criteria.page_size
                ),
                Styles::inactive(),
            ),
        ])
    }
}

impl<S> Navigable for ResourceScreen<S>
where
    S: ListSource,
    S::Entity: Tabular,
{
    fn get_selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    fn get_item_count(&self) -> usize {
        self.list.visible().len()
    }
}

impl<S> Screen for ResourceScreen<S>
where
    S: ListSource,
    S::Entity: Tabular,
{
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let panel_height = if self.panel.is_visible() {
            filter_panel::panel_height(&self.panel)
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(panel_height),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        if self.panel.is_visible() {
            filter_panel::render_filter_panel(
                f,
                chunks[0],
                &self.panel,
                self.list.criteria(),
                self.list.default_page_size(),
                self.focus == Focus::Filters,
            );
        }

        let kind = self.list.kind();
        let title = if self.list.is_loading() {
            format!("{} (loading…)", kind.as_str())
        } else {
            kind.as_str().to_string()
        };
        let visible = self.list.visible();
        render_table(
            f,
            chunks[1],
            &visible,
            &self.expanded,
            self.selected,
            &title,
            self.focus == Focus::Table,
        );

        f.render_widget(Paragraph::new(self.footer()), chunks[2]);

        if let Some(entity) = &self.viewing {
            modal::render_view_modal(f, area, entity, self.view_scroll);
        }
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        if self.viewing.is_some() {
            self.handle_view_key(key);
            return Ok(ScreenAction::None);
        }

        match self.focus {
            Focus::Filters => {
                if let Some(action) = self.handle_filter_key(key) {
                    self.run_panel_action(action).await;
                }
            }
            Focus::Table => self.handle_table_key(key).await,
        }
        Ok(ScreenAction::None)
    }

    fn captures_input(&self) -> bool {
        self.focus == Focus::Filters
    }

    async fn on_enter(&mut self) {
        info!("Opening {} screen", self.list.kind().plural());
        self.load_lookups().await;
        self.panel.sync_from(self.list.criteria());
        self.list.refresh().await;
        self.reset_page_state();
    }

    fn on_exit(&mut self) {
        self.expanded.clear();
        self.viewing = None;
        self.focus = Focus::Table;
    }

    fn take_notices(&mut self) -> Vec<StatusMessage> {
        let mut notices = std::mem::take(&mut self.notices);
        notices.extend(self.list.take_notices());
        notices
    }

    fn help(&self) -> &'static [(&'static str, &'static str)] {
        LIST_HELP
    }
}

/// List screen with add, edit and delete
pub struct CrudScreen<S>
where
    S: ResourceService,
    S::Entity: Editable,
{
    inner: ResourceScreen<S>,
    form: EntityForm<S::Entity>,
    /// (id, title) awaiting a y/n answer
    pending_delete: Option<(String, String)>,
}

impl<S> CrudScreen<S>
where
    S: ResourceService,
    S::Entity: Editable<Draft = S::Draft> + Tabular,
{
    pub fn new(inner: ResourceScreen<S>) -> Self {
        Self {
            inner,
            form: EntityForm::new(),
            pending_delete: None,
        }
    }

    pub fn inner(&self) -> &ResourceScreen<S> {
        &self.inner
    }

    pub fn form(&self) -> &EntityForm<S::Entity> {
        &self.form
    }

    pub fn is_confirming(&self) -> bool {
        self.pending_delete.is_some()
    }

    /// Edit works from a fresh copy; a failed fetch leaves the form closed
    async fn open_edit(&mut self) {
        let id = match self
            .inner
            .viewing
            .as_ref()
            .or_else(|| self.inner.selected_entity())
        {
            Some(entity) => entity.id().to_string(),
            None => return,
        };

        if let Some(entity) = self.inner.list.fetch_one(&id).await {
            self.inner.viewing = None;
            self.form.open_edit(&entity);
        }
    }

    fn ask_delete(&mut self) {
        self.pending_delete = self
            .inner
            .selected_entity()
            .map(|entity| (entity.id().to_string(), entity.title().to_string()));
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some((id, _)) = self.pending_delete.take() {
                    if self.inner.list.delete(&id).await {
                        self.inner.reset_page_state();
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
            }
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.form.close(),
            KeyCode::Enter => {
                if submit_form(&mut self.form, &mut self.inner.list).await {
                    self.inner.reset_page_state();
                }
            }
            KeyCode::Up | KeyCode::BackTab => self.form.focus_prev(),
            KeyCode::Down | KeyCode::Tab => self.form.focus_next(),
            KeyCode::Backspace => self.form.pop_char(),
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }
}

impl<S> Screen for CrudScreen<S>
where
    S: ResourceService,
    S::Entity: Editable<Draft = S::Draft> + Tabular,
{
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.inner.draw(f, area);

        if self.form.is_open() {
            modal::render_form_modal(f, area, &self.form);
        }
        if let Some((_, title)) = &self.pending_delete {
            let message = format!(
                "Are you sure you want to delete {} \"{}\"?",
                self.inner.list.kind().singular(),
                title
            );
            modal::render_confirm(f, area, &message);
        }
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        if self.form.is_open() {
            self.handle_form_key(key).await;
            return Ok(ScreenAction::None);
        }
        if self.pending_delete.is_some() {
            self.handle_confirm_key(key).await;
            return Ok(ScreenAction::None);
        }

        let viewing = self.inner.viewing.is_some();
        if self.inner.focus == Focus::Table || viewing {
            match key.code {
                KeyCode::Char('a') if !viewing => {
                    self.form.open_create();
                    return Ok(ScreenAction::None);
                }
                KeyCode::Char('e') => {
                    self.open_edit().await;
                    return Ok(ScreenAction::None);
                }
                KeyCode::Char('d') if !viewing => {
                    self.ask_delete();
                    return Ok(ScreenAction::None);
                }
                _ => {}
            }
        }

        self.inner.handle_key_event(key).await
    }

    fn captures_input(&self) -> bool {
        self.form.is_open() || self.pending_delete.is_some() || self.inner.captures_input()
    }

    async fn on_enter(&mut self) {
        self.inner.on_enter().await;
    }

    fn on_exit(&mut self) {
        self.inner.on_exit();
        self.form.close();
        self.pending_delete = None;
    }

    fn take_notices(&mut self) -> Vec<StatusMessage> {
        self.inner.take_notices()
    }

    fn help(&self) -> &'static [(&'static str, &'static str)] {
        CRUD_HELP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{assessment, FakeSkillAssessments};
    use ratatui::{backend::TestBackend, Terminal};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn seeded() -> FakeSkillAssessments {
        FakeSkillAssessments::with_items(vec![
            assessment("1", "Engineering Professionals", "General Stream"),
            assessment("2", "Health Professionals", "General Stream"),
        ])
    }

    async fn entered(service: FakeSkillAssessments) -> CrudScreen<FakeSkillAssessments> {
        let mut screen = CrudScreen::new(ResourceScreen::new(service, 15));
        screen.on_enter().await;
        screen
    }

    #[tokio::test]
    async fn test_enter_loads_and_selects_first_row() {
        let screen = entered(seeded()).await;
        assert_eq!(screen.inner().list().items().len(), 2);
        assert_eq!(screen.inner().selected_entity().map(|e| e.id.as_str()), Some("1"));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let service = seeded();
        let mut screen = entered(service.clone()).await;

        screen.handle_key_event(press(KeyCode::Char('d'))).await.unwrap();
        assert!(screen.is_confirming());
        assert!(screen.captures_input());
        screen.handle_key_event(press(KeyCode::Char('n'))).await.unwrap();
        assert!(service.calls().is_empty());

        screen.handle_key_event(press(KeyCode::Char('d'))).await.unwrap();
        screen.handle_key_event(press(KeyCode::Char('y'))).await.unwrap();
        assert_eq!(service.calls(), vec!["delete:1".to_string()]);
        assert_eq!(screen.inner().list().items().len(), 1);
        assert_eq!(
            screen.take_notices().last().map(|n| n.message.clone()),
            Some("Skill assessment deleted successfully".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_form_is_blocked_before_any_request() {
        let service = seeded();
        let mut screen = entered(service.clone()).await;
        let fetches = service.list_calls();

        screen.handle_key_event(press(KeyCode::Char('a'))).await.unwrap();
        assert!(screen.form().is_open());
        screen.handle_key_event(press(KeyCode::Enter)).await.unwrap();

        assert!(screen.form().is_open());
        assert!(service.calls().is_empty());
        assert_eq!(service.list_calls(), fetches);
        assert!(screen.take_notices()[0].is_error());
    }

    #[tokio::test]
    async fn test_edit_seeds_form_from_selected_row() {
        let mut screen = entered(seeded()).await;
        screen.handle_key_event(press(KeyCode::Down)).await.unwrap();
        screen.handle_key_event(press(KeyCode::Char('e'))).await.unwrap();

        assert!(screen.form().is_open());
        assert_eq!(screen.form().editing_id(), Some("2"));
        assert_eq!(screen.form().value("occupationGroups"), "Health Professionals");
    }

    #[tokio::test]
    async fn test_filter_panel_applies_selected_option() {
        let service = seeded();
        let mut screen = entered(service.clone()).await;
        screen.inner.panel.set_options(
            FilterKey::OccupationGroups,
            vec!["Health Professionals".to_string()],
        );

        screen.handle_key_event(press(KeyCode::Char('f'))).await.unwrap();
        assert_eq!(screen.inner().focus(), Focus::Filters);
        assert!(screen.captures_input());

        screen.handle_key_event(press(KeyCode::Right)).await.unwrap();
        screen.handle_key_event(press(KeyCode::Enter)).await.unwrap();

        let query = service.last_query().unwrap_or_default();
        assert!(query.contains(&(
            "occupationGroups".to_string(),
            "Health Professionals".to_string()
        )));
        assert_eq!(screen.inner().list().items().len(), 1);
    }

    #[tokio::test]
    async fn test_draw_with_view_modal() {
        let mut screen = entered(seeded()).await;
        screen.handle_key_event(press(KeyCode::Enter)).await.unwrap();

        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| screen.draw(f, f.size())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Engineering Professionals"));
        assert!(text.contains("Showing 2 of 2 skill assessments"));
    }
}
