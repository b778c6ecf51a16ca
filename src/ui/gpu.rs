use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::ui::widgets::{LineChart, Series, detail_line, indexed, panel, ready};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let [charts_area, details_area] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    let [util_area, mem_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(charts_area);

    let history = &app.state.gpu_history;
    let first = history.iter().next().map_or("", |p| p.label.as_str());
    let last = history.latest().map_or("", |p| p.label.as_str());

    let utilization = indexed(history.iter().map(|p| p.utilization));
    LineChart {
        title: "GPU Utilization",
        series: vec![Series {
            name: "utilization",
            points: &utilization,
            color: theme.chart_primary,
        }],
        y_max: 100.0,
        y_suffix: "%",
        labels: (first, last),
    }
    .render(frame, util_area, theme);

    let memory = indexed(history.iter().map(|p| p.memory_used_gb));
    let peak = memory.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max);
    LineChart {
        title: "GPU Memory",
        series: vec![Series {
            name: "used",
            points: &memory,
            color: theme.chart_secondary,
        }],
        y_max: peak.ceil().max(1.0),
        y_suffix: "G",
        labels: (first, last),
    }
    .render(frame, mem_area, theme);

    let Some(info) = ready(frame, details_area, "Adapter", &app.state.gpu, theme) else {
        return;
    };
    let lines = vec![
        detail_line("Model", info.model.clone(), theme),
        detail_line("Vendor", info.vendor.clone(), theme),
        detail_line("Utilization", info.utilization.clone(), theme),
        detail_line("Memory", info.used_memory.clone(), theme),
        detail_line("Usage", format!("{:.1}%", info.usage_percent), theme),
        detail_line("Dedicated", info.memory.dedicated.clone(), theme),
        detail_line("Shared", info.memory.shared.clone(), theme),
        detail_line("Driver", info.driver_version.clone(), theme),
        detail_line("Driver date", info.driver_date.clone(), theme),
        detail_line("DirectX", info.direct_x_version.clone(), theme),
        detail_line("Location", info.physical_location.clone(), theme),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Adapter", theme)), details_area);
}
