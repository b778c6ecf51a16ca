use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::ui::widgets::{
    LineChart, Series, detail_line, indexed, panel, percent_label, ready, usage_gauge,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let [chart_area, gauge_area, details_area] = Layout::vertical([
        Constraint::Percentage(50),
        Constraint::Length(3),
        Constraint::Min(4),
    ])
    .areas(area);

    let history = &app.state.disk_history;
    let points = indexed(history.iter().map(|p| p.percent));
    let first = history.iter().next().map_or("", |p| p.label.as_str());
    let last = history.latest().map_or("", |p| p.label.as_str());
    LineChart {
        title: "Storage Used",
        series: vec![Series {
            name: "used",
            points: &points,
            color: theme.chart_primary,
        }],
        y_max: 100.0,
        y_suffix: "%",
        labels: (first, last),
    }
    .render(frame, chart_area, theme);

    let Some(info) = ready(frame, gauge_area, "Capacity", &app.state.disk, theme) else {
        return;
    };
    frame.render_widget(usage_gauge("Capacity", info.used_percent(), theme), gauge_area);

    let lines = vec![
        detail_line("Type", info.kind.clone(), theme),
        detail_line("Capacity", format!("{} GB", info.capacity), theme),
        detail_line("Used", format!("{} GB", info.used_gb), theme),
        detail_line("Free", format!("{:.1} GB", info.free), theme),
        detail_line("Used share", info.storage_percent.clone(), theme),
        detail_line("Computed", percent_label(info.used_percent()), theme),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Storage", theme)), details_area);
}
