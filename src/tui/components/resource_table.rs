//! Table rendering for resource collections with expandable line items

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::line_items::{LineItem, NOT_AVAILABLE};
use crate::models::{
    Accommodation, HealthInsurance, Institution, Resource, SkillAssessment, VisaService,
};
use crate::state::ExpandedRows;
use crate::tui::ui::{fit_width, Styles};

/// Marker for empty badge-style cells
pub const EMPTY_BADGE: &str = "—";

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub width: usize,
}

const fn col(title: &'static str, width: usize) -> Column {
    Column { title, width }
}

/// How an entity is laid out as a row and in the view modal
pub trait Tabular: Resource {
    fn columns() -> &'static [Column];

    fn cells(&self) -> Vec<String>;

    fn details(&self) -> Vec<(&'static str, String)>;

    /// Headers for the nested rows
    fn line_item_labels() -> (&'static str, &'static str) {
        ("Item", "Commission")
    }
}

fn or_na(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn or_na_str(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

fn or_badge(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY_BADGE)
        .to_string()
}

/// "Yes" when the field has any content
fn yes_badge(value: &Option<String>) -> String {
    or_badge(value.as_deref().filter(|v| !v.trim().is_empty()).map(|_| "Yes"))
}

fn timestamp(value: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .as_ref()
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

const INSTITUTION_COLUMNS: &[Column] = &[
    col("Name", 28),
    col("Country", 11),
    col("State", 6),
    col("Sector", 16),
    col("Territory", 16),
    col("Group", 12),
    col("Promoted", 10),
    col("100%", 5),
    col("Scholarship", 11),
];

impl Tabular for Institution {
    fn columns() -> &'static [Column] {
        INSTITUTION_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        let territory = self.territory_label();
        vec![
            self.name.clone(),
            self.country.clone(),
            or_badge(self.state.as_deref()),
            or_badge(Some(self.sector.as_str())),
            or_badge(Some(territory.as_str())),
            or_badge(self.group_label()),
            or_badge(self.promoted.as_deref()),
            yes_badge(&self.promotion),
            yes_badge(&self.scholarship),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Country", or_na_str(&self.country)),
            ("State", or_na(&self.state)),
            ("Sector", or_na_str(&self.sector)),
            ("Website", or_na(&self.url)),
            ("Territory", or_na_str(&self.territory_label())),
            ("Group", self.group_label().unwrap_or(NOT_AVAILABLE).to_string()),
            ("Promoted", or_na(&self.promoted)),
            ("100% Promotion", or_na(&self.promotion)),
            ("Scholarship", or_na(&self.scholarship)),
            ("Created", timestamp(&self.created_at)),
            ("Updated", timestamp(&self.updated_at)),
        ]
    }

    fn line_item_labels() -> (&'static str, &'static str) {
        ("Course", "Commission")
    }
}

const INSURANCE_COLUMNS: &[Column] = &[col("Company", 32), col("Country", 16), col("Items", 6)];

impl Tabular for HealthInsurance {
    fn columns() -> &'static [Column] {
        INSURANCE_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.company.clone(),
            or_na_str(&self.country),
            self.items.len().to_string(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Company", self.company.clone()),
            ("Country", or_na_str(&self.country)),
            ("Created", timestamp(&self.created_at)),
            ("Updated", timestamp(&self.updated_at)),
        ]
    }
}

const VISA_COLUMNS: &[Column] = &[
    col("Service Type", 34),
    col("Country", 14),
    col("Service Fee", 16),
    col("Referral Fee", 16),
];

impl Tabular for VisaService {
    fn columns() -> &'static [Column] {
        VISA_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.service_type.clone(),
            or_na_str(&self.country),
            or_na_str(&self.service_fee),
            or_na_str(&self.referral_fee),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Service Type", self.service_type.clone()),
            ("Country", or_na_str(&self.country)),
            ("Service Fee", or_na_str(&self.service_fee)),
            ("Referral Fee", or_na_str(&self.referral_fee)),
            ("Created", timestamp(&self.created_at)),
            ("Updated", timestamp(&self.updated_at)),
        ]
    }
}

const SKILL_ASSESSMENT_COLUMNS: &[Column] = &[
    col("Occupation Groups", 30),
    col("Pathways/Streams", 22),
    col("Standard Fee", 12),
    col("Priority Fee", 12),
    col("Standard Time", 14),
    col("Priority", 8),
];

impl Tabular for SkillAssessment {
    fn columns() -> &'static [Column] {
        SKILL_ASSESSMENT_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_na_str(&self.occupation_groups),
            or_na_str(&self.pathways_streams),
            or_na(&self.standard_fee_aud),
            or_na(&self.priority_fee_aud),
            or_na(&self.standard_processing_time),
            or_na(&self.priority_available),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Occupation Groups", or_na_str(&self.occupation_groups)),
            ("Pathways/Streams", or_na_str(&self.pathways_streams)),
            ("Standard Fee (AUD)", or_na(&self.standard_fee_aud)),
            ("Priority Fee (AUD)", or_na(&self.priority_fee_aud)),
            ("Standard Processing Time", or_na(&self.standard_processing_time)),
            ("Priority Processing Time", or_na(&self.priority_processing_time)),
            ("Priority Available", or_na(&self.priority_available)),
            ("Documents Checklist", or_na(&self.documents_checklist)),
            ("Official Link", or_na(&self.official_link)),
            ("Created", timestamp(&self.created_at)),
            ("Updated", timestamp(&self.updated_at)),
        ]
    }
}

const ACCOMMODATION_COLUMNS: &[Column] = &[
    col("Company", 28),
    col("Country", 14),
    col("Locations", 30),
    col("Items", 6),
];

impl Tabular for Accommodation {
    fn columns() -> &'static [Column] {
        ACCOMMODATION_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.company.clone(),
            or_na_str(&self.country),
            or_na_str(&self.locations.join(", ")),
            self.items.len().to_string(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Company", self.company.clone()),
            ("Country", or_na_str(&self.country)),
            ("Locations", or_na_str(&self.locations.join(", "))),
            ("Created", timestamp(&self.created_at)),
            ("Updated", timestamp(&self.updated_at)),
        ]
    }

    fn line_item_labels() -> (&'static str, &'static str) {
        ("Room Type", "Commission")
    }
}

/// One rendered line of the table body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRow {
    Entity {
        index: usize,
        expandable: bool,
        expanded: bool,
    },
    LineItem {
        parent: usize,
        item: LineItem,
    },
}

/// Flatten entities and their expanded line items into display rows
pub fn build_rows<E: Resource>(entities: &[&E], expanded: &ExpandedRows) -> Vec<DisplayRow> {
    let mut rows = Vec::new();
    for (index, entity) in entities.iter().enumerate() {
        let items = entity.line_items();
        let is_expanded = !items.is_empty() && expanded.is_expanded(entity.id());

        rows.push(DisplayRow::Entity {
            index,
            expandable: !items.is_empty(),
            expanded: is_expanded,
        });

        if is_expanded {
            rows.extend(
                items
                    .into_iter()
                    .map(|item| DisplayRow::LineItem { parent: index, item }),
            );
        }
    }
    rows
}

fn format_cells(cells: &[String], columns: &[Column]) -> String {
    columns
        .iter()
        .zip(cells)
        .map(|(column, cell)| fit_width(cell, column.width))
        .collect::<Vec<_>>()
        .join(" │ ")
}

/// Render the table. `selected` indexes into `entities`.
pub fn render_table<E: Tabular>(
    f: &mut Frame,
    area: Rect,
    entities: &[&E],
    expanded: &ExpandedRows,
    selected: Option<usize>,
    title: &str,
    focused: bool,
) {
    let border_style = if focused {
        Styles::active_border()
    } else {
        Styles::inactive_border()
    };
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style);

    if entities.is_empty() {
        let empty = Paragraph::new(format!("No {} found", E::KIND.plural()))
            .style(Styles::inactive())
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let columns = E::columns();
    let titles: Vec<String> = columns.iter().map(|c| c.title.to_string()).collect();
    let mut items = vec![ListItem::new(Line::from(Span::styled(
        format!("  {}", format_cells(&titles, columns)),
        Styles::title(),
    )))];

    let (_, commission_label) = E::line_item_labels();
    let name_width = columns.first().map_or(24, |c| c.width);
    let mut selected_row = None;

    for row in build_rows(entities, expanded) {
        match row {
            DisplayRow::Entity {
                index,
                expandable,
                expanded,
            } => {
                let marker = match (expandable, expanded) {
                    (true, true) => "▾ ",
                    (true, false) => "▸ ",
                    _ => "  ",
                };
                let style = if Some(index) == selected {
                    selected_row = Some(items.len());
                    Styles::selected()
                } else {
                    Style::default()
                };
                let text = format!("{}{}", marker, format_cells(&entities[index].cells(), columns));
                items.push(ListItem::new(Line::from(Span::styled(text, style))));
            }
            DisplayRow::LineItem { item, .. } => {
                let line = Line::from(vec![
                    Span::styled("    • ", Styles::inactive()),
                    Span::raw(fit_width(&item.name, name_width + 10)),
                    Span::styled(format!(" {}: ", commission_label), Styles::inactive()),
                    Span::styled(item.commission, Styles::badge()),
                ]);
                items.push(ListItem::new(line));
            }
        }
    }

    let mut state = ListState::default();
    state.select(selected_row);
    let list = List::new(items).block(block);
    f.render_stateful_widget(list, area, &mut state);
}
