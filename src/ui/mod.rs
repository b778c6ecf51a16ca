pub mod cpu;
pub mod disk;
pub mod gpu;
pub mod header;
pub mod help;
pub mod memory;
pub mod overview;
pub mod processes;
pub mod statusbar;
pub mod theme;
pub mod widgets;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::app::{App, Tab};

pub fn draw(frame: &mut Frame, app: &App) {
    let [header_area, content_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    header::render(frame, header_area, app);

    match app.tab {
        Tab::Overview => overview::render(frame, content_area, app),
        Tab::Processes => processes::render(frame, content_area, app),
        Tab::Cpu => cpu::render(frame, content_area, app),
        Tab::Memory => memory::render(frame, content_area, app),
        Tab::Disk => disk::render(frame, content_area, app),
        Tab::Gpu => gpu::render(frame, content_area, app),
    }

    statusbar::render(frame, status_area, app);

    // Help overlay, rendered last to appear on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}

#[cfg(test)]
mod tests;
