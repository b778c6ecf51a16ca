use crate::app::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    SelectTab(Tab),
    ToggleHelp,
    CycleTheme,
    Refresh,
    ScrollUp,
    ScrollDown,
    None,
}
