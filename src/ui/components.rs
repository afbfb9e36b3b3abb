use crate::model::ScanResult;
use crate::ui::app::{App, AppState};
use humansize::{BINARY, format_size};
use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};
use std::fmt::Write as _;
use std::path::Path;

const TITLE: &str = concat!("cachesweep v", env!("CARGO_PKG_VERSION"));

pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let disks = app.disks.list();
    let disk_info = disks
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| disks.first());

    let header_text = if let Some(disk) = disk_info {
        let total = disk.total_space();
        let available = disk.available_space();
        let used = total.saturating_sub(available);
        let percent = if total > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                (used as f64 / total as f64) * 100.0
            }
        } else {
            0.0
        };

        format!(
            "{TITLE} | Disk {}: {} / {} ({percent:.1}% Used)",
            disk.mount_point().display(),
            format_size(used, BINARY),
            format_size(total, BINARY)
        )
    } else {
        format!("{TITLE} | Disk: N/A")
    };

    let title = Paragraph::new(header_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

pub fn render_scanning(f: &mut Frame, app: &App, area: Rect) {
    let mut progress: Vec<_> = app.scan_progress.values().collect();
    progress.sort_by(|a, b| a.category.name().cmp(b.category.name()));
    let lines: Vec<Line> = progress
        .into_iter()
        .map(|p| {
            Line::from(format!(
                "{:<16} {:<12} {:>8} items",
                p.category.name(),
                p.status,
                p.items_count
            ))
        })
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let done = app.results.len();
    let total = app.total_categories.max(1);
    #[allow(clippy::cast_precision_loss)]
    let ratio = (done as f64 / total as f64).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Scanning"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .label(format!("{done}/{} categories", app.total_categories))
        .ratio(ratio);
    f.render_widget(gauge, chunks[0]);

    let status = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Progress"));
    f.render_widget(status, chunks[1]);
}

pub fn render_categories_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .results
        .iter()
        .map(|r| {
            let checkbox = if r.is_selected { "[x]" } else { "[ ]" };
            let size_str = format_size(r.total_size, BINARY);
            let content = format!("{checkbox} {:<20}  {:>10}", r.category.name(), size_str);
            ListItem::new(content)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Categories"))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Yellow),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.list_state);
}

pub fn render_usage_chart(f: &mut Frame, app: &App, area: Rect) {
    let short_data: Vec<(&str, u64)> = app
        .results
        .iter()
        .map(|r| (r.category.short_label(), r.total_size / 1024 / 1024))
        .collect();

    let barchart = BarChart::default()
        .block(
            Block::default()
                .title("Storage Usage (MB)")
                .borders(Borders::ALL),
        )
        .data(&short_data)
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::White).bg(Color::Cyan));

    f.render_widget(barchart, area);
}

fn details_text(result: &ScanResult) -> String {
    let mut text = format!(
        "Path: {}\n{}\n{} entries\n\nTop Large Items:\n",
        result.root_path.display(),
        result.description,
        result.items.len()
    );

    for item in result.items.iter().take(10) {
        let item_name = item.path.file_name().unwrap_or_default().to_string_lossy();
        let _ = writeln!(text, " - {item_name} ({})", format_size(item.size, BINARY));
    }
    text
}

pub fn render_details_text(f: &mut Frame, app: &App, area: Rect) {
    let selected_index = app.list_state.selected().unwrap_or(0);

    if let Some(selected_result) = app.results.get(selected_index) {
        let details = Paragraph::new(details_text(selected_result))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Details: {}", selected_result.category.name())),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(details, area);
    } else {
        f.render_widget(
            Block::default().borders(Borders::ALL).title("Details"),
            area,
        );
    }
}

pub fn render_details(f: &mut Frame, app: &App, area: Rect) {
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_usage_chart(f, app, right_chunks[0]);
    render_details_text(f, app, right_chunks[1]);
}

fn footer_text(app: &App) -> String {
    let total_selected = format_size(app.total_selected_size(), BINARY);
    match app.state {
        AppState::Browsing => format!(
            "Total Selected: {total_selected} | [Space] Toggle [a] All [Enter] Clean [r] Rescan [q] Quit"
        ),
        AppState::Confirming if app.trash_selected() => format!(
            "PERMANENTLY DELETE? Selected: {total_selected}, empties the whole trash | [y/Enter] Confirm [n/Esc] Cancel"
        ),
        AppState::Confirming => format!(
            "PERMANENTLY DELETE? Selected: {total_selected} | [y/Enter] Confirm [n/Esc] Cancel"
        ),
        AppState::Cleaning => "Cleaning... (This may take a while)".to_string(),
        AppState::Scanning => "Scanning caches and trash... [q] Quit".to_string(),
        AppState::Done(_) => "Done! [r] Rescan, any other key to continue".to_string(),
    }
}

pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let footer = Paragraph::new(footer_text(app)).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

pub fn render_popup(f: &mut Frame, app: &App) {
    if let AppState::Done(ref msg) = app.state {
        let block = Block::default()
            .title("Clean Completed")
            .borders(Borders::ALL);
        let area = centered_rect(60, 20, f.area());
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(msg.clone())
                .block(block)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
