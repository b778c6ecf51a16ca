use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, key_label};
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // A failed all-or-nothing cycle takes priority
    if let Some(msg) = app.state.cycle_error.as_deref() {
        let line = Line::from(Span::styled(
            format!(" {msg}"),
            Style::default()
                .fg(theme.status_err)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let kb = &app.keybinds;
    let quit = key_label(kb.quit);
    let next = key_label(kb.next_tab);
    let refresh = key_label(kb.refresh);
    let theme_key = key_label(kb.cycle_theme);
    let help = key_label(kb.help);

    let mut spans = Vec::new();
    spans.extend(pill_spans(&quit, "Quit", theme));
    spans.extend(pill_spans(&next, "View", theme));
    spans.extend(pill_spans("1-6", "Jump", theme));
    spans.extend(pill_spans(&refresh, "Refresh", theme));
    spans.extend(pill_spans(&theme_key, "Theme", theme));
    spans.extend(pill_spans(&help, "Help", theme));

    let updated = app
        .state
        .last_update
        .map_or_else(|| "waiting for data".to_string(), |t| {
            format!("updated {}", t.format("%H:%M:%S"))
        });
    spans.push(Span::styled(
        format!("  {updated}"),
        Style::default().fg(theme.text_secondary),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: &str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
