//! Sign-in form shown when there is no session

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::auth::LoginCredentials;
use crate::tui::components::InputField;
use crate::tui::traits::{Screen, ScreenAction};
use crate::tui::ui::{centered_rect, key_hints, Styles};

const LOGIN_HELP: &[(&str, &str)] = &[
    ("Tab / ↑/↓", "Switch field"),
    ("Enter", "Next field / sign in"),
    ("Esc", "Quit"),
];

pub struct LoginScreen {
    email: InputField,
    password: InputField,
    focused: usize,
    error: Option<String>,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginScreen {
    pub fn new() -> Self {
        let mut email = InputField::new("Email")
            .with_placeholder("you@agency.com")
            .required();
        email.set_focus(true);

        Self {
            email,
            password: InputField::new("Password").required().masked(),
            focused: 0,
            error: None,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Forget everything typed, e.g. after a successful sign in
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn credentials(&self) -> LoginCredentials {
        LoginCredentials {
            email: self.email.value.trim().to_string(),
            password: self.password.value.clone(),
        }
    }

    fn switch_field(&mut self) {
        self.focused = 1 - self.focused;
        self.email.set_focus(self.focused == 0);
        self.password.set_focus(self.focused == 1);
    }

    fn focused_field(&mut self) -> &mut InputField {
        if self.focused == 0 {
            &mut self.email
        } else {
            &mut self.password
        }
    }
}

impl Screen for LoginScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 60, area);
        let block = Block::default()
            .title("Agency Admin - Sign in")
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        self.email.render(f, chunks[0]);
        self.password.render(f, chunks[1]);

        if let Some(error) = &self.error {
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(error.clone(), Styles::error()))),
                chunks[2],
            );
        }

        f.render_widget(
            Paragraph::new(key_hints(&[("Tab", "Switch"), ("Enter", "Sign in"), ("Esc", "Quit")])),
            chunks[4],
        );
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::Quit),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.switch_field(),
            KeyCode::Enter if self.focused == 0 => self.switch_field(),
            KeyCode::Enter => {
                self.error = None;
                return Ok(ScreenAction::SignIn(self.credentials()));
            }
            KeyCode::Backspace => self.focused_field().delete_char(),
            KeyCode::Char(c) => self.focused_field().insert_char(c),
            _ => {}
        }
        Ok(ScreenAction::None)
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn help(&self) -> &'static [(&'static str, &'static str)] {
        LOGIN_HELP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(press(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_enter_moves_to_password_then_submits() {
        let mut screen = LoginScreen::new();
        type_text(&mut screen, " admin@agency.com ").await;

        let action = screen.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        assert_eq!(action, ScreenAction::None);

        type_text(&mut screen, "secret").await;
        let action = screen.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        assert_eq!(
            action,
            ScreenAction::SignIn(LoginCredentials {
                email: "admin@agency.com".to_string(),
                password: "secret".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_reset_clears_typed_values() {
        let mut screen = LoginScreen::new();
        type_text(&mut screen, "someone").await;
        screen.set_error("Invalid credentials");
        screen.reset();
        assert!(screen.email.is_empty());
        assert!(screen.error.is_none());
    }
}
