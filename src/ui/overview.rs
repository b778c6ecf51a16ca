use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Sparkline;

use crate::app::App;
use crate::client::DomainView;
use crate::ui::processes;
use crate::ui::theme::Theme;
use crate::ui::widgets::{panel, ready, usage_gauge};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let [table_area, side_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    processes::render_table(frame, table_area, app, false);

    let [cpu, memory, disk, gpu, trend] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(side_area);

    let state = &app.state;
    let theme = &app.theme;
    gauge(frame, cpu, "CPU", &state.cpu, state.cpu_percent(), theme);
    gauge(frame, memory, "Memory", &state.memory, state.memory_percent(), theme);
    gauge(frame, disk, "Disk", &state.disk, state.disk_percent(), theme);
    gauge(frame, gpu, "GPU", &state.gpu, state.gpu_percent(), theme);

    if ready(frame, trend, "CPU Trend", &state.cpu, theme).is_none() {
        return;
    }

    let samples: Vec<u64> = state
        .overview_cpu
        .iter()
        .map(|&v| v.clamp(0.0, 100.0).round() as u64)
        .collect();
    let sparkline = Sparkline::default()
        .block(panel("CPU Trend", theme))
        .data(&samples)
        .max(100)
        .style(Style::default().fg(theme.chart_primary));
    frame.render_widget(sparkline, trend);
}

/// Usage gauge for one domain, or its loading/error placeholder.
fn gauge<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    view: &DomainView<T>,
    percent: Option<f64>,
    theme: &Theme,
) {
    if ready(frame, area, title, view, theme).is_some() {
        frame.render_widget(usage_gauge(title, percent, theme), area);
    }
}
