//! Filter panel rendering

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::{FilterCriteria, FilterPanel, PanelMode};
use crate::tui::ui::{key_hints, Styles};

/// Rows needed to draw the panel: fields, hint line and borders
pub fn panel_height(panel: &FilterPanel) -> u16 {
    panel.visible_fields().len() as u16 + 3
}

/// Text lines of the panel; split out so the content can be tested without a terminal
pub fn panel_lines(
    panel: &FilterPanel,
    active: &FilterCriteria,
    default_page_size: usize,
    focused: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (i, field) in panel.visible_fields().into_iter().enumerate() {
        let value = panel.value(field.key);
        let shown = if value.is_empty() {
            if field.is_text() {
                Span::styled("type to search", Styles::inactive())
            } else {
                Span::styled("All", Styles::inactive())
            }
        } else {
            Span::raw(value.to_string())
        };

        let is_focused = focused && i == panel.focused_index();
        let label_style = if is_focused {
            Styles::selected()
        } else {
            Style::default()
        };
        let arrows = if is_focused && !field.is_text() { "  ◂ ▸" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", field.key.label()), label_style),
            shown,
            Span::styled(arrows, Styles::inactive()),
        ]));
    }

    let mut hints: Vec<(&str, &str)> = Vec::new();
    if panel.mode() == PanelMode::ApplyThenClear {
        hints.push(("Enter", "Apply"));
    }
    if panel.shows_clear(active, default_page_size) {
        hints.push(("Ctrl+L", "Clear"));
    }
    hints.push(("Tab", "Back to table"));
    lines.push(key_hints(&hints));

    lines
}

pub fn render_filter_panel(
    f: &mut Frame,
    area: Rect,
    panel: &FilterPanel,
    active: &FilterCriteria,
    default_page_size: usize,
    focused: bool,
) {
    let border_style = if focused {
        Styles::active_border()
    } else {
        Styles::inactive_border()
    };
    let title = match panel.mode() {
        PanelMode::AutoApply => "Filters (applied as you change them)",
        PanelMode::ApplyThenClear => "Filters",
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = panel_lines(panel, active, default_page_size, focused);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceKind;
    use crate::state::FilterKey;

    fn text_of(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_auto_apply_hides_clear_for_default_criteria() {
        let panel = FilterPanel::for_kind(ResourceKind::Institutions);
        let defaults = FilterCriteria::new(15);

        let text = text_of(&panel_lines(&panel, &defaults, 15, true));
        assert!(!text.contains("Clear"));
        assert!(!text.contains("Apply"));

        let active = defaults.with(FilterKey::Country, "Australia");
        let text = text_of(&panel_lines(&panel, &active, 15, true));
        assert!(text.contains("Clear"));
    }

    #[test]
    fn test_apply_then_clear_shows_both_actions() {
        let panel = FilterPanel::for_kind(ResourceKind::VisaServices);
        let text = text_of(&panel_lines(&panel, &FilterCriteria::new(15), 15, false));
        assert!(text.contains("Apply"));
        assert!(text.contains("Clear"));
        assert_eq!(panel_height(&panel), 5);
    }
}
