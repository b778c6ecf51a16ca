use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Cell, Row, Table};

use crate::app::App;
use crate::format::truncate_unicode;
use crate::metrics::ProcessSample;
use crate::ui::theme::Theme;
use crate::ui::widgets::{panel, ready};

const NAME_WIDTH: usize = 24;

/// Full process table with threads, priority, user and status.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    render_table(frame, area, app, true);
}

/// Process table; `detailed` adds the columns only the Processes view shows.
pub fn render_table(frame: &mut Frame, area: Rect, app: &App, detailed: bool) {
    let theme = &app.theme;
    let Some(samples) = ready(frame, area, "Top Processes", &app.state.processes, theme) else {
        return;
    };

    let mut header = vec!["PID", "Name", "CPU %", "Mem %", "Power"];
    let mut widths = vec![
        Constraint::Length(7),
        Constraint::Min(12),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(9),
    ];
    if detailed {
        header.extend(["Threads", "Prio", "User", "Status"]);
        widths.extend([
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Length(10),
        ]);
    }

    let header = Row::new(header).style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = samples
        .iter()
        .skip(app.process_scroll)
        .map(|p| process_row(p, detailed, theme))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(panel("Top Processes", theme));
    frame.render_widget(table, area);
}

fn process_row<'a>(p: &ProcessSample, detailed: bool, theme: &Theme) -> Row<'a> {
    let text = Style::default().fg(theme.text_primary);
    let mut cells = vec![
        Cell::from(p.pid.to_string()).style(Style::default().fg(theme.text_secondary)),
        Cell::from(truncate_unicode(&p.name, NAME_WIDTH)).style(text),
        Cell::from(format!("{:.1}", p.cpu)).style(text),
        Cell::from(format!("{:.1}", p.mem)).style(text),
        Cell::from(p.power.label()).style(Style::default().fg(theme.power_color(p.power))),
    ];
    if detailed {
        cells.extend([
            Cell::from(p.threads.to_string()).style(text),
            Cell::from(p.priority.to_string()).style(text),
            Cell::from(truncate_unicode(&p.user, 12)).style(text),
            Cell::from(p.status.clone()).style(Style::default().fg(theme.text_secondary)),
        ]);
    }
    Row::new(cells)
}
