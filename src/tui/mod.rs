//! Terminal dashboard
//!
//! One screen per resource behind a sidebar, a sign-in screen when there is
//! no session, and a status bar fed by the notifications each screen queues.

pub mod app;
pub mod components;
pub mod screens;
pub mod traits;
pub mod ui;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

pub use app::{App, ScreenKind};

use crate::api::ApiClient;
use crate::config::Config;

/// Set up the terminal, run the dashboard and always restore the terminal afterwards
pub async fn run(config: &Config, client: ApiClient) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, client);
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => info!("Dashboard exited"),
        Err(e) => error!("Dashboard failed: {}", e),
    }
    result
}
