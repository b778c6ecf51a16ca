use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::client::{DashboardState, FetchMode, PollUpdate};
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::ui::theme::{ColorSupport, Theme, resolve_color_support};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Processes,
    Cpu,
    Memory,
    Disk,
    Gpu,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Processes,
        Tab::Cpu,
        Tab::Memory,
        Tab::Disk,
        Tab::Gpu,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Processes => "Processes",
            Tab::Cpu => "CPU",
            Tab::Memory => "Memory",
            Tab::Disk => "Disk",
            Tab::Gpu => "GPU",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Tab::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub help: KeyCode,
    pub refresh: KeyCode,
    pub next_tab: KeyCode,
    pub prev_tab: KeyCode,
    pub cycle_theme: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            next_tab: parse_key(&kb.next_tab).unwrap_or(KeyCode::Tab),
            prev_tab: parse_key(&kb.prev_tab).unwrap_or(KeyCode::BackTab),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.next_tab), "Next view"),
            (key_label(self.prev_tab), "Previous view"),
            ("1-6".to_string(), "Jump to view"),
            (key_label(self.refresh), "Fetch now"),
            (key_label(self.cycle_theme), "Cycle theme"),
            (key_label(self.help), "Toggle help"),
            ("\u{2191}\u{2193}".to_string(), "Scroll processes"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "S-Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Left => "\u{2190}".to_string(),
        KeyCode::Right => "\u{2192}".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    pub tab: Tab,
    pub input_mode: InputMode,
    pub state: DashboardState,
    pub theme: Theme,
    pub color_support: ColorSupport,
    pub keybinds: ResolvedKeybinds,
    pub server_url: String,
    pub fetch_mode: FetchMode,
    pub process_scroll: usize,
    refresh_requested: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let color_support = resolve_color_support(&config.colors.color_support);
        App {
            running: true,
            tab: Tab::Overview,
            input_mode: InputMode::Normal,
            state: DashboardState::new(config.history.capacities()),
            theme: Theme::from_config(&config.colors.theme, color_support),
            color_support,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            server_url: config.dashboard.server_url.clone(),
            fetch_mode: config.dashboard.fetch_mode,
            process_scroll: 0,
            refresh_requested: false,
        }
    }

    pub fn on_poll(&mut self, update: PollUpdate) {
        self.on_poll_at(update, Local::now());
    }

    pub fn on_poll_at(&mut self, update: PollUpdate, now: DateTime<Local>) {
        self.state.apply(update.payload, now);
        let rows = self.state.processes.latest.as_ref().map_or(0, Vec::len);
        self.process_scroll = self.process_scroll.min(rows.saturating_sub(1));
    }

    /// True once per [`Action::Refresh`].
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // View digits and arrows are hardwired (not configurable)
        if let KeyCode::Char(c @ '1'..='6') = code {
            let index = c as usize - '1' as usize;
            return Tab::from_index(index).map_or(Action::None, Action::SelectTab);
        }
        if code == KeyCode::Up {
            return Action::ScrollUp;
        }
        if code == KeyCode::Down {
            return Action::ScrollDown;
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.next_tab {
            return Action::NextTab;
        }
        if code == kb.prev_tab {
            return Action::PrevTab;
        }
        if code == kb.cycle_theme {
            return Action::CycleTheme;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::NextTab => self.tab = self.tab.next(),
            Action::PrevTab => self.tab = self.tab.prev(),
            Action::SelectTab(tab) => self.tab = tab,
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::CycleTheme => {
                self.theme = self.theme.next(self.color_support);
            }
            Action::Refresh => self.refresh_requested = true,
            Action::ScrollUp => {
                self.process_scroll = self.process_scroll.saturating_sub(1);
            }
            Action::ScrollDown => {
                let rows = self.state.processes.latest.as_ref().map_or(0, Vec::len);
                if self.process_scroll + 1 < rows {
                    self.process_scroll += 1;
                }
            }
            Action::None => {}
        }
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }
}
