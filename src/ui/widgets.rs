use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, Gauge, GraphType, Paragraph,
};

use crate::client::DomainView;
use crate::ui::theme::Theme;

pub const LOADING: &str = "Loading...";

pub fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
}

/// Draws a titled panel holding a single centered message.
pub fn render_message(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    color: Color,
    theme: &Theme,
) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(color),
    )))
    .alignment(Alignment::Center)
    .block(panel(title, theme));
    frame.render_widget(paragraph, area);
}

/// Returns the latest value, or draws the loading/error placeholder and returns `None`.
/// An error from the most recent fetch takes precedence over stale data.
pub fn ready<'v, T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    view: &'v DomainView<T>,
    theme: &Theme,
) -> Option<&'v T> {
    if let Some(err) = view.error.as_deref() {
        render_message(frame, area, title, err, theme.status_err, theme);
        return None;
    }
    match view.latest.as_ref() {
        Some(value) => Some(value),
        None => {
            render_message(frame, area, title, LOADING, theme.text_secondary, theme);
            None
        }
    }
}

pub fn detail_line<'a>(label: &'a str, value: String, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {label:<14}"), Style::default().fg(theme.text_secondary)),
        Span::styled(value, Style::default().fg(theme.text_primary)),
    ])
}

pub fn percent_label(percent: Option<f64>) -> String {
    percent.map_or_else(|| "N/A".to_string(), |p| format!("{p:.1}%"))
}

/// Gauge with `percent` clamped into range; values over 100 still show their label.
pub fn usage_gauge<'a>(title: &'a str, percent: Option<f64>, theme: &Theme) -> Gauge<'a> {
    let value = percent.unwrap_or(0.0);
    let ratio = (value / 100.0).clamp(0.0, 1.0);
    Gauge::default()
        .block(panel(title, theme))
        .gauge_style(
            Style::default()
                .fg(theme.usage_color(value))
                .bg(theme.gauge_unfilled),
        )
        .ratio(if ratio.is_finite() { ratio } else { 0.0 })
        .label(percent_label(percent))
}

pub struct Series<'a> {
    pub name: &'a str,
    pub points: &'a [(f64, f64)],
    pub color: Color,
}

/// Line chart over indexed samples.
pub struct LineChart<'a> {
    pub title: &'a str,
    pub series: Vec<Series<'a>>,
    pub y_max: f64,
    pub y_suffix: &'a str,
    /// Labels of the oldest and newest sample.
    pub labels: (&'a str, &'a str),
}

impl LineChart<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let samples = self.series.iter().map(|s| s.points.len()).max().unwrap_or(0);
        if samples == 0 {
            render_message(frame, area, self.title, LOADING, theme.text_secondary, theme);
            return;
        }

        let datasets: Vec<Dataset> = self
            .series
            .iter()
            .map(|s| {
                Dataset::default()
                    .name(s.name.to_string())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(s.color))
                    .data(s.points)
            })
            .collect();

        let axis_style = Style::default().fg(theme.text_secondary);
        let x_max = samples.saturating_sub(1).max(1) as f64;
        let y_max = if self.y_max.is_finite() && self.y_max > 0.0 {
            self.y_max
        } else {
            1.0
        };
        let suffix = self.y_suffix;

        let chart = Chart::new(datasets)
            .block(panel(self.title, theme))
            .x_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds([0.0, x_max])
                    .labels([self.labels.0.to_string(), self.labels.1.to_string()]),
            )
            .y_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds([0.0, y_max])
                    .labels([
                        format!("0{suffix}"),
                        format!("{:.0}{suffix}", y_max / 2.0),
                        format!("{y_max:.0}{suffix}"),
                    ]),
            );
        frame.render_widget(chart, area);
    }
}

/// Indexes history values for a chart.
pub fn indexed<I: IntoIterator<Item = f64>>(values: I) -> Vec<(f64, f64)> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v))
        .collect()
}
