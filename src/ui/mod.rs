pub mod app;
pub mod components;

use crate::ui::app::{App, AppState};
use crate::ui::components::{
    render_categories_list, render_details, render_footer, render_header, render_popup,
    render_scanning,
};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use std::time::Duration;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the event loop does after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(f.area());

    render_header(f, app, header);
    match app.state {
        AppState::Scanning => render_scanning(f, app, body),
        _ => {
            let [list, details] =
                Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .areas(body);
            render_categories_list(f, app, list);
            render_details(f, app, details);
        }
    }
    render_footer(f, app, footer);
    render_popup(f, app);
}

/// Applies one key press to `app`.
pub fn handle_key(app: &mut App, code: KeyCode) -> Flow {
    match app.state {
        AppState::Browsing => match code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char(' ') => app.toggle(),
            KeyCode::Char('a') => app.toggle_all(),
            KeyCode::Char('r') => {
                debug!("rescan requested");
                app.rescan();
            }
            KeyCode::Enter if app.total_selected_size() > 0 => {
                app.state = AppState::Confirming;
            }
            _ => {}
        },
        AppState::Confirming => match code {
            KeyCode::Char('y') | KeyCode::Enter => app.clean_selected(),
            KeyCode::Char('n' | 'q') | KeyCode::Esc => app.state = AppState::Browsing,
            _ => {}
        },
        // Deletion runs to completion.
        AppState::Cleaning => {}
        AppState::Scanning => {
            if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                return Flow::Quit;
            }
        }
        AppState::Done(_) => match code {
            KeyCode::Char('r') => app.rescan(),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ' | 'q') => {
                app.state = AppState::Browsing;
            }
            _ => {}
        },
    }
    Flow::Continue
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stderr>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        app.tick();

        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key.code) == Flow::Quit
        {
            return Ok(());
        }
    }
}
