//! Status bar showing the latest notification

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;

use crate::state::{StatusMessage, StatusType};
use crate::tui::ui::Styles;

/// Status display component
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub message_history: Vec<StatusMessage>,
    pub max_history: usize,
    pub show_timestamp: bool,
    pub auto_clear_timeout: Option<Duration>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 100,
            show_timestamp: false,
            auto_clear_timeout: None,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamp = true;
        self
    }

    pub fn with_auto_clear(mut self, timeout: Duration) -> Self {
        self.auto_clear_timeout = Some(timeout);
        self
    }

    /// Set current status message
    pub fn set_message(&mut self, message: StatusMessage) {
        self.archive_current();
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::info(message));
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::success(message));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::error(message));
    }

    pub fn set_loading(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::loading(message));
    }

    /// Clear current message
    pub fn clear(&mut self) {
        self.archive_current();
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn get_history(&self) -> &[StatusMessage] {
        &self.message_history
    }

    /// Errors stay until replaced; everything else fades after the timeout
    pub fn should_auto_clear(&self) -> bool {
        if let (Some(timeout), Some(message)) = (self.auto_clear_timeout, &self.current_message) {
            if message.is_error() {
                return false;
            }
            let elapsed = chrono::Local::now().signed_duration_since(message.timestamp);
            return elapsed.to_std().unwrap_or_default() > timeout;
        }
        false
    }

    fn style_for(status_type: StatusType) -> Style {
        match status_type {
            StatusType::Info => Styles::info(),
            StatusType::Success => Styles::success(),
            StatusType::Warning => Styles::warning(),
            StatusType::Error => Styles::error(),
            StatusType::Loading => Styles::warning(),
        }
    }

    /// Render with the given idle text when there is no message
    pub fn render(&self, f: &mut Frame, area: Rect, idle_text: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => (self.format_message(message), Self::style_for(message.status_type)),
            None => (idle_text.to_string(), Styles::inactive()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        f.render_widget(Paragraph::new(content).style(style).block(block), area);
    }

    /// Format message for display
    pub fn format_message(&self, message: &StatusMessage) -> String {
        let prefix = match message.status_type {
            StatusType::Info => "ℹ",
            StatusType::Success => "✓",
            StatusType::Warning => "⚠",
            StatusType::Error => "✗",
            StatusType::Loading => "⟳",
        };

        if self.show_timestamp {
            format!(
                "{} [{}] {}",
                prefix,
                message.timestamp.format("%H:%M:%S"),
                message.message
            )
        } else {
            format!("{} {}", prefix, message.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_previous_messages() {
        let mut status = StatusDisplay::new();
        status.set_info("Loading institutions");
        status.set_success("Institution created successfully");
        assert_eq!(status.get_history().len(), 1);
        assert_eq!(
            status.format_message(status.get_current().unwrap()),
            "✓ Institution created successfully"
        );
        status.clear();
        assert!(status.get_current().is_none());
        assert_eq!(status.get_history().len(), 2);
    }

    #[test]
    fn test_errors_do_not_auto_clear() {
        let mut status = StatusDisplay::new().with_auto_clear(Duration::from_secs(0));
        status.set_error("Failed to fetch visa services");
        assert!(!status.should_auto_clear());
    }
}
