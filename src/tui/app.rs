//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use tracing::info;

use super::components::StatusDisplay;
use super::screens::{CrudScreen, HelpScreen, LoginScreen, ResourceScreen};
use super::traits::{Screen, ScreenAction};
use super::ui::{centered_rect, Styles};
use crate::api::{
    self, AccommodationService, ApiClient, HealthInsurances, Institutions, SkillAssessments,
    VisaServices,
};
use crate::auth::{AuthContext, LoginCredentials};
use crate::config::Config;
use crate::models::ResourceKind;
use crate::state::StatusType;

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Login,
    Institutions,
    Insurance,
    VisaServices,
    SkillAssessments,
    Accommodation,
    Help,
}

impl ScreenKind {
    /// Sidebar order once signed in
    pub const MENU: [ScreenKind; 6] = [
        ScreenKind::Institutions,
        ScreenKind::Insurance,
        ScreenKind::VisaServices,
        ScreenKind::SkillAssessments,
        ScreenKind::Accommodation,
        ScreenKind::Help,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ScreenKind::Login => "Sign in",
            ScreenKind::Institutions => "Institutions",
            ScreenKind::Insurance => "Health Insurance",
            ScreenKind::VisaServices => "Visa Services",
            ScreenKind::SkillAssessments => "Skill Assessments",
            ScreenKind::Accommodation => "Accommodation",
            ScreenKind::Help => "Help",
        }
    }

    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            ScreenKind::Institutions => Some(ResourceKind::Institutions),
            ScreenKind::Insurance => Some(ResourceKind::Insurance),
            ScreenKind::VisaServices => Some(ResourceKind::VisaServices),
            ScreenKind::SkillAssessments => Some(ResourceKind::SkillAssessments),
            ScreenKind::Accommodation => Some(ResourceKind::Accommodation),
            ScreenKind::Login | ScreenKind::Help => None,
        }
    }

    fn menu_position(&self) -> Option<usize> {
        Self::MENU.iter().position(|kind| kind == self)
    }

    /// Neighbour in the sidebar, wrapping around
    pub fn cycle(&self, forward: bool) -> ScreenKind {
        let count = Self::MENU.len();
        let next = match self.menu_position() {
            Some(i) if forward => (i + 1) % count,
            Some(i) => (i + count - 1) % count,
            None => 0,
        };
        Self::MENU[next]
    }
}

/// Run `$body` with `$screen` bound to the active screen
macro_rules! on_screen {
    ($app:expr, $screen:ident => $body:expr) => {
        match $app.current_screen {
            ScreenKind::Login => {
                let $screen = &mut $app.login;
                $body
            }
            ScreenKind::Institutions => {
                let $screen = &mut $app.institutions;
                $body
            }
            ScreenKind::Insurance => {
                let $screen = &mut $app.insurance;
                $body
            }
            ScreenKind::VisaServices => {
                let $screen = &mut $app.visa_services;
                $body
            }
            ScreenKind::SkillAssessments => {
                let $screen = &mut $app.skill_assessments;
                $body
            }
            ScreenKind::Accommodation => {
                let $screen = &mut $app.accommodation;
                $body
            }
            ScreenKind::Help => {
                let $screen = &mut $app.help;
                $body
            }
        }
    };
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: ScreenKind,
    auth: AuthContext,
    status: StatusDisplay,

    // Screen states
    login: LoginScreen,
    institutions: CrudScreen<Institutions>,
    insurance: CrudScreen<HealthInsurances>,
    visa_services: CrudScreen<VisaServices>,
    skill_assessments: CrudScreen<SkillAssessments>,
    accommodation: ResourceScreen<AccommodationService>,
    help: HelpScreen,

    should_quit: bool,
    show_help_popup: bool,
    /// The active screen still has to run `on_enter` after the next frame
    needs_enter: bool,
}

impl App {
    pub fn new(config: &Config, client: ApiClient) -> Self {
        let page_size = config.page_size;

        let institutions = ResourceScreen::new(api::institutions(client.clone()), page_size)
            .with_export(api::institutions(client.clone()), config.export_dir.clone());
        let skill_assessments =
            ResourceScreen::new(api::skill_assessments(client.clone()), page_size)
                .with_lookups(api::skill_assessments(client.clone()));

        Self {
            current_screen: ScreenKind::Login,
            status: StatusDisplay::new().with_auto_clear(Duration::from_secs(5)),

            login: LoginScreen::new(),
            institutions: CrudScreen::new(institutions),
            insurance: CrudScreen::new(ResourceScreen::new(
                api::health_insurances(client.clone()),
                page_size,
            )),
            visa_services: CrudScreen::new(ResourceScreen::new(
                api::visa_services(client.clone()),
                page_size,
            )),
            skill_assessments: CrudScreen::new(skill_assessments),
            accommodation: ResourceScreen::new(AccommodationService::new(client.clone()), page_size),
            help: HelpScreen::new(),
            auth: AuthContext::new(client),

            should_quit: false,
            show_help_popup: false,
            needs_enter: false,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.status.set_loading("Checking session…");
        terminal.draw(|f| self.draw(f))?;

        self.auth.initialize().await;
        if self.auth.is_authenticated() {
            self.status.clear();
            self.navigate_to(ScreenKind::Institutions);
        } else {
            self.status.set_info("Please sign in");
        }

        loop {
            if self.status.should_auto_clear() {
                self.status.clear();
            }

            terminal.draw(|f| self.draw(f))?;

            // The loading frame is on screen; fetch now
            if self.needs_enter {
                self.needs_enter = false;
                on_screen!(self, screen => screen.on_enter().await);
                self.drain_notices();
                continue;
            }

            if crossterm::event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key).await?;
                    }
                }
            }

            self.drain_notices();

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle keyboard input events
    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help_popup = false;
            }
            return Ok(());
        }

        if key.code == KeyCode::F(1) {
            self.show_help_popup = true;
            return Ok(());
        }

        // Global shortcuts are off while the screen takes text
        let captures = on_screen!(self, screen => screen.captures_input());
        if !captures {
            let signed_in = self.auth.is_authenticated();
            match key.code {
                KeyCode::Char('?') => {
                    self.show_help_popup = true;
                    return Ok(());
                }
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Tab | KeyCode::BackTab if signed_in => {
                    let next = self.current_screen.cycle(key.code == KeyCode::Tab);
                    self.navigate_to(next);
                    return Ok(());
                }
                KeyCode::Char(c @ '1'..='6') if signed_in => {
                    let index = c as usize - '1' as usize;
                    self.navigate_to(ScreenKind::MENU[index]);
                    return Ok(());
                }
                KeyCode::Char('L') if signed_in => {
                    self.sign_out().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        let action = on_screen!(self, screen => screen.handle_key_event(key).await)?;
        self.handle_action(action).await;
        Ok(())
    }

    async fn handle_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(kind) => self.navigate_to(kind),
            ScreenAction::SignIn(credentials) => self.sign_in(credentials).await,
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::None => {}
        }
    }

    async fn sign_in(&mut self, credentials: LoginCredentials) {
        self.status.set_loading("Signing in…");

        match self.auth.login(&credentials).await {
            Ok(user) => {
                let name = user.display_name().to_string();
                self.status.set_success(format!("Welcome, {}", name));
                self.login.reset();
                self.navigate_to(ScreenKind::Institutions);
            }
            Err(e) => {
                let message = e.to_string();
                self.login.set_error(message.clone());
                self.status.set_error(message);
            }
        }
    }

    async fn sign_out(&mut self) {
        on_screen!(self, screen => screen.on_exit());
        self.auth.logout().await;
        self.login.reset();
        self.current_screen = ScreenKind::Login;
        self.status.set_info("Signed out");
    }

    /// Switch screens; the new one loads after the next frame is drawn
    pub fn navigate_to(&mut self, kind: ScreenKind) {
        if kind != ScreenKind::Login && !self.auth.is_authenticated() {
            return;
        }
        if kind == self.current_screen {
            return;
        }

        on_screen!(self, screen => screen.on_exit());
        info!("Navigating to {}", kind.title());
        self.current_screen = kind;
        self.needs_enter = true;

        if let Some(resource) = kind.resource() {
            self.status
                .set_loading(format!("Loading {}…", resource.plural()));
        }
    }

    /// Move notifications from the active screen into the status bar
    fn drain_notices(&mut self) {
        let notices = on_screen!(self, screen => screen.take_notices());
        let had_notices = !notices.is_empty();
        for notice in notices {
            self.status.set_message(notice);
        }

        let still_loading = self
            .status
            .get_current()
            .is_some_and(|message| message.status_type == StatusType::Loading);
        if !had_notices && still_loading && !self.needs_enter {
            self.status.clear();
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        if self.current_screen == ScreenKind::Login {
            self.login.draw(f, chunks[0]);
        } else {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(24), Constraint::Min(0)])
                .split(chunks[0]);

            self.draw_sidebar(f, body[0]);
            on_screen!(self, screen => screen.draw(f, body[1]));
        }

        let idle = format!(
            "Agency Admin - {} | Tab: Switch | F1/?: Help | q: Quit",
            self.current_screen.title()
        );
        self.status.render(f, chunks[1], &idle);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_sidebar(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(area);

        let items: Vec<ListItem> = ScreenKind::MENU
            .iter()
            .enumerate()
            .map(|(i, kind)| ListItem::new(format!("{} {}", i + 1, kind.title())))
            .collect();

        let mut state = ListState::default();
        state.select(self.current_screen.menu_position());

        let menu = List::new(items)
            .block(Block::default().title("Menu").borders(Borders::ALL))
            .highlight_style(Styles::selected())
            .highlight_symbol("▶ ");
        f.render_stateful_widget(menu, chunks[0], &mut state);

        let user = self
            .auth
            .user()
            .map(|user| user.display_name().to_string())
            .unwrap_or_else(|| "Not signed in".to_string());
        let account = Paragraph::new(vec![
            Line::from(Span::styled(user, Styles::info())),
            Line::from(Span::styled("L: sign out", Styles::inactive())),
        ])
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(account, chunks[1]);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 70, area);
        f.render_widget(Clear, popup_area);

        let mut lines = vec![
            Line::from(Span::styled("Global", Styles::title())),
            Line::from("  Tab / Shift+Tab   Switch screen"),
            Line::from("  1-6               Jump to screen"),
            Line::from("  F1 / ?            Toggle this help"),
            Line::from("  L                 Sign out"),
            Line::from("  q / Ctrl+C        Quit"),
            Line::from(""),
            Line::from(Span::styled(self.current_screen.title(), Styles::title())),
        ];

        let screen_help = match self.current_screen {
            ScreenKind::Login => self.login.help(),
            ScreenKind::Institutions => self.institutions.help(),
            ScreenKind::Insurance => self.insurance.help(),
            ScreenKind::VisaServices => self.visa_services.help(),
            ScreenKind::SkillAssessments => self.skill_assessments.help(),
            ScreenKind::Accommodation => self.accommodation.help(),
            ScreenKind::Help => self.help.help(),
        };
        for (key, action) in screen_help {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<18}", key), Styles::warning()),
                Span::raw(action.to_string()),
            ]));
        }

        let help_popup = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .border_style(Styles::warning()),
            );
        f.render_widget(help_popup, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_through_menu() {
        assert_eq!(ScreenKind::Institutions.cycle(true), ScreenKind::Insurance);
        assert_eq!(ScreenKind::Help.cycle(true), ScreenKind::Institutions);
        assert_eq!(ScreenKind::Institutions.cycle(false), ScreenKind::Help);
        assert_eq!(ScreenKind::Login.cycle(true), ScreenKind::Institutions);
    }

    #[tokio::test]
    async fn test_navigation_requires_session() {
        let config = Config::default();
        let client = ApiClient::new(&config).unwrap();
        let mut app = App::new(&config, client);

        app.navigate_to(ScreenKind::Institutions);
        assert_eq!(app.current_screen, ScreenKind::Login);
        assert!(!app.needs_enter);
    }

    #[test]
    fn test_resource_screens_map_to_kinds() {
        assert_eq!(
            ScreenKind::SkillAssessments.resource(),
            Some(ResourceKind::SkillAssessments)
        );
        assert_eq!(ScreenKind::Help.resource(), None);
    }
}
