//! Popups: read-only view, create/edit form and delete confirmation

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::form_field::InputField;
use super::resource_table::Tabular;
use crate::models::Editable;
use crate::state::EntityForm;
use crate::tui::ui::{centered_rect, key_hints, Styles};

/// Detail lines followed by the nested line items
pub fn view_lines<E: Tabular>(entity: &E) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = entity
        .details()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<26}", label), Styles::title()),
                Span::raw(value),
            ])
        })
        .collect();

    let items = entity.line_items();
    if !items.is_empty() {
        let (item_label, commission_label) = E::line_item_labels();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{}s ({})", item_label, items.len()),
            Styles::title(),
        )));
        for item in items {
            lines.push(Line::from(vec![
                Span::styled("  • ", Styles::inactive()),
                Span::raw(item.name),
                Span::styled(format!("  {}: ", commission_label), Styles::inactive()),
                Span::styled(item.commission, Styles::badge()),
            ]));
        }
    }

    lines
}

pub fn render_view_modal<E: Tabular>(f: &mut Frame, area: Rect, entity: &E, scroll: u16) {
    let popup = centered_rect(80, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!("{} - {}", E::KIND.as_str(), entity.title()))
        .borders(Borders::ALL)
        .border_style(Styles::active_border());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let body = Paragraph::new(view_lines(entity))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(body, chunks[0]);
    f.render_widget(
        Paragraph::new(key_hints(&[("↑/↓", "Scroll"), ("e", "Edit"), ("Esc", "Close")])),
        chunks[1],
    );
}

/// First field index shown so the focused one stays inside a window of `rows`
fn window_start(focused: usize, rows: usize) -> usize {
    if rows == 0 {
        return focused;
    }
    (focused + 1).saturating_sub(rows)
}

pub fn render_form_modal<E: Editable>(f: &mut Frame, area: Rect, form: &EntityForm<E>) {
    let popup = centered_rect(70, 85, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(form.title())
        .borders(Borders::ALL)
        .border_style(Styles::active_border());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let fields = form.fields();
    let rows = (chunks[0].height / 3) as usize;
    let start = window_start(form.focused_index(), rows);

    for (slot, (index, spec)) in fields.iter().enumerate().skip(start).take(rows).enumerate() {
        let mut input = InputField::new(spec.label)
            .with_placeholder(spec.placeholder)
            .with_value(form.value(spec.key));
        if spec.required {
            input = input.required();
        }
        input.set_focus(index == form.focused_index());

        let field_area = Rect {
            x: chunks[0].x,
            y: chunks[0].y + (slot as u16) * 3,
            width: chunks[0].width,
            height: 3,
        };
        input.render(f, field_area);
    }

    f.render_widget(
        Paragraph::new(key_hints(&[
            ("↑/↓ Tab", "Field"),
            ("Enter", "Save"),
            ("Esc", "Cancel"),
            ("*", "Required"),
        ])),
        chunks[1],
    );
}

/// Blocking yes/no prompt
pub fn render_confirm(f: &mut Frame, area: Rect, message: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::raw(message.to_string())),
        Line::from(""),
        key_hints(&[("y", "Confirm"), ("n/Esc", "Cancel")]),
    ];
    let block = Block::default()
        .title("Confirm")
        .borders(Borders::ALL)
        .border_style(Styles::warning());
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        popup,
    );
}
