//! Agency admin: API client, list state and terminal dashboard for
//! institutions, health insurance, visa services, skill assessments and
//! accommodation partners.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod line_items;
pub mod models;
pub mod state;
pub mod tui;
