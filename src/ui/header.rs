use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};

use crate::app::{App, Tab};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [brand_area, tabs_area, source_area] = Layout::horizontal([
        Constraint::Length(11),
        Constraint::Min(20),
        Constraint::Length(source_width(&app.server_url)),
    ])
    .areas(inner);

    let brand = Span::styled(
        " hostwatch ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(Line::from(brand)), brand_area);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(theme.text_secondary))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("|");
    frame.render_widget(tabs, tabs_area);

    let source = Line::from(vec![
        Span::styled(
            app.fetch_mode.label(),
            Style::default().fg(theme.text_secondary),
        ),
        Span::raw(" "),
        Span::styled(app.server_url.as_str(), Style::default().fg(theme.accent)),
    ]);
    frame.render_widget(Paragraph::new(source).alignment(Alignment::Right), source_area);
}

fn source_width(url: &str) -> u16 {
    // mode label, a space and the url
    (url.chars().count() + 15).min(60) as u16
}
