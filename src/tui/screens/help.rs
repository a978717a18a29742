//! Help screen

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::traits::{Screen, ScreenAction, Scrollable};
use crate::tui::ui::Styles;

const HELP_KEYS: &[(&str, &str)] = &[("↑/↓", "Scroll"), ("Home", "Top")];

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("Tab / Shift+Tab", "Next / previous screen"),
            ("F1 / ?", "Context help popup"),
            ("L", "Sign out"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
    (
        "Tables",
        &[
            ("↑/↓ Home/End", "Move selection"),
            ("Space / → / ←", "Expand or collapse courses and items"),
            ("Enter / v", "View all fields"),
            ("PgUp / PgDn", "Previous / next page"),
            ("+", "Rows per page: 15, 25, 50, 100"),
            ("r", "Reload from the server"),
        ],
    ),
    (
        "Filters",
        &[
            ("f", "Show the filter panel"),
            ("↑/↓", "Move between inputs"),
            ("← / →", "Change a select"),
            ("typing", "Edit the search text"),
            ("Enter", "Apply (visa, insurance, skill assessments, accommodation)"),
            ("Ctrl+L", "Clear all filters"),
            ("Esc / Tab", "Back to the table"),
        ],
    ),
    (
        "Editing",
        &[
            ("a", "Add a record"),
            ("e", "Edit the selected or viewed record"),
            ("d", "Delete after confirming with y"),
            ("Enter", "Save the form"),
            ("Esc", "Discard the form"),
            ("x", "Export institutions to a spreadsheet"),
        ],
    ),
];

pub struct HelpScreen {
    scroll_offset: usize,
}

impl Default for HelpScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpScreen {
    pub fn new() -> Self {
        Self { scroll_offset: 0 }
    }

    fn lines() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Manage institutions, health insurance, visa services, skill assessments and accommodation.",
                Styles::info(),
            )),
            Line::from(""),
        ];

        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(title.to_string(), Styles::title())));
            for (key, action) in keys.iter() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<18}", key), Styles::warning()),
                    Span::raw(action.to_string()),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines
    }
}

impl Scrollable for HelpScreen {
    fn get_scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }

    fn calculate_max_scroll(&self) -> usize {
        Self::lines().len().saturating_sub(1)
    }
}

impl Screen for HelpScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let help = Paragraph::new(Self::lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset as u16, 0));
        f.render_widget(help, area);
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::Home => self.scroll_to_top(),
            _ => {}
        }
        Ok(ScreenAction::None)
    }

    fn help(&self) -> &'static [(&'static str, &'static str)] {
        HELP_KEYS
    }
}
