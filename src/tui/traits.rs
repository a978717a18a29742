//! Core traits shared by the dashboard screens

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::auth::LoginCredentials;
use crate::state::StatusMessage;
use crate::tui::app::ScreenKind;

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Switch to a different screen
    NavigateTo(ScreenKind),
    /// Credentials submitted from the login form
    SignIn(LoginCredentials),
    /// Quit the application
    Quit,
    /// No action taken
    None,
}

/// Core trait for all dashboard screens
pub trait Screen {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an action for the app
    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction>;

    /// Screen is currently taking text input, so global shortcuts are off
    fn captures_input(&self) -> bool {
        false
    }

    /// Called when the screen becomes active
    async fn on_enter(&mut self) {}

    /// Called when the screen becomes inactive
    fn on_exit(&mut self) {}

    /// Notifications produced since the last call
    fn take_notices(&mut self) -> Vec<StatusMessage> {
        Vec::new()
    }

    /// Context help lines for the help popup
    fn help(&self) -> &'static [(&'static str, &'static str)];
}

/// Trait for screens with navigable lists
pub trait Navigable {
    /// Get currently selected index
    fn get_selected_index(&self) -> Option<usize>;

    /// Set selected index
    fn set_selected_index(&mut self, index: Option<usize>);

    /// Get total number of items
    fn get_item_count(&self) -> usize;

    /// Move selection up, wrapping to the end
    fn navigate_up(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let selected = self.get_selected_index().unwrap_or(0);
        let next = if selected == 0 { count - 1 } else { selected - 1 };
        self.set_selected_index(Some(next));
    }

    /// Move selection down, wrapping to the start
    fn navigate_down(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let next = match self.get_selected_index() {
            Some(selected) => (selected + 1) % count,
            None => 0,
        };
        self.set_selected_index(Some(next));
    }

    /// Navigate to first item
    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    /// Navigate to last item
    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }

    /// Keep the selection inside the list after it shrinks
    fn clamp_selection(&mut self) {
        let count = self.get_item_count();
        match self.get_selected_index() {
            _ if count == 0 => self.set_selected_index(None),
            Some(selected) if selected >= count => self.set_selected_index(Some(count - 1)),
            None => self.set_selected_index(Some(0)),
            _ => {}
        }
    }
}

/// Trait for screens with scrollable content
pub trait Scrollable {
    fn get_scroll_offset(&self) -> usize;

    fn set_scroll_offset(&mut self, offset: usize);

    fn calculate_max_scroll(&self) -> usize;

    fn scroll_up(&mut self, amount: usize) {
        let current = self.get_scroll_offset();
        self.set_scroll_offset(current.saturating_sub(amount));
    }

    fn scroll_down(&mut self, amount: usize) {
        let current = self.get_scroll_offset();
        let max_scroll = self.calculate_max_scroll();
        self.set_scroll_offset(std::cmp::min(current + amount, max_scroll));
    }

    fn scroll_to_top(&mut self) {
        self.set_scroll_offset(0);
    }
}
