//! Reusable widgets for the dashboard screens

pub mod filter_panel;
pub mod form_field;
pub mod modal;
pub mod resource_table;
pub mod status_display;

pub use form_field::InputField;
pub use resource_table::{render_table, Tabular};
pub use status_display::StatusDisplay;
