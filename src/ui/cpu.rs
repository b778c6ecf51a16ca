use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::metrics::CpuInfo;
use crate::ui::theme::Theme;
use crate::ui::widgets::{LineChart, Series, detail_line, indexed, panel, percent_label, ready};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let [chart_area, details_area] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);

    let history = &app.state.cpu_history;
    let points = indexed(history.iter().map(|p| p.utilization));
    let first = history.iter().next().map_or("", |p| p.label.as_str());
    let last = history.latest().map_or("", |p| p.label.as_str());
    LineChart {
        title: "CPU Utilization",
        series: vec![Series {
            name: "utilization",
            points: &points,
            color: theme.chart_primary,
        }],
        y_max: 100.0,
        y_suffix: "%",
        labels: (first, last),
    }
    .render(frame, chart_area, theme);

    let [perf_area, spec_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(details_area);

    let Some(info) = ready(frame, perf_area, "Performance", &app.state.cpu, theme) else {
        // keep the second panel consistent with the first
        ready(frame, spec_area, "Specifications", &app.state.cpu, theme);
        return;
    };
    frame.render_widget(
        Paragraph::new(performance_lines(info, theme)).block(panel("Performance", theme)),
        perf_area,
    );
    frame.render_widget(
        Paragraph::new(specification_lines(info, theme)).block(panel("Specifications", theme)),
        spec_area,
    );
}

fn performance_lines<'a>(info: &CpuInfo, theme: &Theme) -> Vec<Line<'a>> {
    let speed = &info.current_speed;
    let load = &info.load;
    let mut lines = vec![
        detail_line("Utilization", percent_label(Some(info.utilization())), theme),
        detail_line("Speed", format!("{:.2} GHz", speed.avg_ghz), theme),
        detail_line(
            "Min / Max",
            format!("{:.2} / {:.2} GHz", speed.min_ghz, speed.max_ghz),
            theme,
        ),
        detail_line("Processes", info.totalprocess.to_string(), theme),
        detail_line("User", percent_label(load.user_load_percent), theme),
        detail_line("System", percent_label(load.system_load_percent), theme),
        detail_line("Idle", percent_label(load.idle_load_percent), theme),
    ];
    let temperature = info
        .temperature
        .as_ref()
        .and_then(|t| t.main_celsius)
        .map_or_else(|| "N/A".to_string(), |c| format!("{c:.1} \u{b0}C"));
    lines.push(detail_line("Temperature", temperature, theme));
    lines
}

fn specification_lines<'a>(info: &CpuInfo, theme: &Theme) -> Vec<Line<'a>> {
    vec![
        detail_line("Manufacturer", info.manufacturer.clone(), theme),
        detail_line("Brand", info.brand.clone(), theme),
        detail_line("Base speed", format!("{:.2} GHz", info.base_speed_ghz), theme),
        detail_line(
            "Cores",
            format!("{} physical / {} logical", info.physical_cores, info.logical_cores),
            theme,
        ),
        detail_line("Processors", info.processors.to_string(), theme),
        detail_line("L2 cache", format!("{} KB", info.cache2), theme),
        detail_line("L3 cache", format!("{} MB", info.cache3), theme),
    ]
}
