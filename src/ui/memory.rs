use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use crate::app::App;
use crate::format::format_bytes;
use crate::metrics::{BYTES_PER_GB, MemoryInfo};
use crate::ui::theme::Theme;
use crate::ui::widgets::{LineChart, Series, detail_line, indexed, panel, percent_label, ready};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let [chart_area, details_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    let total_gb = app
        .state
        .memory
        .latest
        .as_ref()
        .map_or(0.0, |m| m.totalmemory as f64 / BYTES_PER_GB);
    let history = &app.state.memory_history;
    let points = indexed(history.iter().map(|p| p.used_gb));
    let first = history.iter().next().map_or("", |p| p.label.as_str());
    let last = history.latest().map_or("", |p| p.label.as_str());
    LineChart {
        title: "Memory Usage",
        series: vec![Series {
            name: "used",
            points: &points,
            color: theme.chart_primary,
        }],
        y_max: total_gb.ceil(),
        y_suffix: "G",
        labels: (first, last),
    }
    .render(frame, chart_area, theme);

    let [summary_area, modules_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(details_area);

    let Some(info) = ready(frame, summary_area, "Memory", &app.state.memory, theme) else {
        ready(frame, modules_area, "Modules", &app.state.memory, theme);
        return;
    };
    render_summary(frame, summary_area, info, theme);
    render_modules(frame, modules_area, info, theme);
}

fn render_summary(frame: &mut Frame, area: Rect, info: &MemoryInfo, theme: &Theme) {
    let lines = vec![
        detail_line("Total", format_bytes(info.totalmemory), theme),
        detail_line("Used", format_bytes(info.usedmemory), theme),
        detail_line("Free", format_bytes(info.freememory), theme),
        detail_line("Available", format_bytes(info.availablememory), theme),
        detail_line("In use", percent_label(info.used_percent()), theme),
        detail_line(
            "Swap",
            format!(
                "{} / {}",
                format_bytes(info.swapused),
                format_bytes(info.swaptotal)
            ),
            theme,
        ),
        detail_line(
            "Slots used",
            format!("{} of {}", info.layout.len(), info.slots),
            theme,
        ),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Memory", theme)), area);
}

fn render_modules(frame: &mut Frame, area: Rect, info: &MemoryInfo, theme: &Theme) {
    let header = Row::new(["Bank", "Size", "Type", "Speed", "Form", "Vendor"]).style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );
    let text = Style::default().fg(theme.text_primary);
    let rows: Vec<Row> = info
        .layout
        .iter()
        .map(|m| {
            let speed = m
                .clock_speed
                .map_or_else(|| "N/A".to_string(), |mhz| format!("{mhz} MHz"));
            Row::new([
                Cell::from(m.bank.clone()),
                Cell::from(format_bytes(m.size)),
                Cell::from(m.kind.clone()),
                Cell::from(speed),
                Cell::from(m.form_factor.clone()),
                Cell::from(m.manufacturer.clone()),
            ])
            .style(text)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .column_spacing(1)
    .block(panel("Modules", theme));
    frame.render_widget(table, area);
}
