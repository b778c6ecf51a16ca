use ratatui::style::Color;

use crate::metrics::PowerTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    Auto,
    Truecolor,
    Color256,
    Mono,
}

impl ColorSupport {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "truecolor" | "24bit" => ColorSupport::Truecolor,
            "256" | "256color" => ColorSupport::Color256,
            "mono" | "monochrome" => ColorSupport::Mono,
            _ => ColorSupport::Auto,
        }
    }
}

pub fn detect_color_support() -> ColorSupport {
    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorSupport::Truecolor;
    }
    ColorSupport::Color256
}

pub fn resolve_color_support(config: &str) -> ColorSupport {
    let parsed = ColorSupport::from_config_str(config);
    if parsed == ColorSupport::Auto {
        detect_color_support()
    } else {
        parsed
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub chart_primary: Color,
    pub chart_secondary: Color,
    /// Low, moderate and high load.
    pub load_colors: [Color; 3],
}

impl Theme {
    pub fn from_config(theme_name: &str, support: ColorSupport) -> Self {
        if support == ColorSupport::Mono {
            return Self::mono();
        }
        let mut theme = match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            "vivid" => Self::vivid(),
            _ => Self::dark(),
        };
        theme.apply_color_support(support);
        theme
    }

    pub fn next(&self, support: ColorSupport) -> Self {
        let next_name = match self.name {
            "dark" => "vivid",
            "vivid" => "light",
            _ => "dark",
        };
        Theme::from_config(next_name, support)
    }

    pub fn power_color(&self, tier: PowerTier) -> Color {
        match tier {
            PowerTier::Low => self.load_colors[0],
            PowerTier::Moderate => self.load_colors[1],
            PowerTier::High => self.load_colors[2],
        }
    }

    /// Gauge color for a utilization percentage.
    pub fn usage_color(&self, percent: f64) -> Color {
        if percent >= 80.0 {
            self.load_colors[2]
        } else if percent >= 50.0 {
            self.load_colors[1]
        } else {
            self.gauge_filled
        }
    }

    fn apply_color_support(&mut self, support: ColorSupport) {
        let map = |c: Color| adapt_color(c, support);

        self.header_accent_bg = map(self.header_accent_bg);
        self.header_accent_fg = map(self.header_accent_fg);
        self.status_ok = map(self.status_ok);
        self.status_err = map(self.status_err);
        self.statusbar_bg = map(self.statusbar_bg);
        self.overlay_border = map(self.overlay_border);
        self.text_primary = map(self.text_primary);
        self.text_secondary = map(self.text_secondary);
        self.accent = map(self.accent);
        self.pill_key_bg = map(self.pill_key_bg);
        self.pill_key_fg = map(self.pill_key_fg);
        self.pill_desc_fg = map(self.pill_desc_fg);
        self.surface_bg = map(self.surface_bg);
        self.gauge_filled = map(self.gauge_filled);
        self.gauge_unfilled = map(self.gauge_unfilled);
        self.chart_primary = map(self.chart_primary);
        self.chart_secondary = map(self.chart_secondary);
        self.load_colors = self.load_colors.map(map);
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            status_ok: Color::Green,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            accent: Color::Green,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            gauge_filled: Color::Rgb(103, 232, 249),
            gauge_unfilled: Color::DarkGray,
            chart_primary: Color::Rgb(96, 165, 250),
            chart_secondary: Color::Rgb(251, 146, 60),
            load_colors: [
                Color::Rgb(16, 185, 129),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            status_ok: Color::Rgb(0, 120, 0),
            status_err: Color::Red,
            statusbar_bg: Color::Rgb(220, 220, 220),
            overlay_border: Color::Rgb(150, 150, 150),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            accent: Color::Blue,
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(200, 200, 200),
            gauge_filled: Color::Rgb(70, 130, 180),
            gauge_unfilled: Color::Rgb(200, 200, 200),
            chart_primary: Color::Rgb(70, 130, 180),
            chart_secondary: Color::Rgb(160, 80, 160),
            load_colors: [
                Color::Rgb(100, 180, 100),
                Color::Rgb(220, 180, 50),
                Color::Rgb(200, 60, 60),
            ],
        }
    }

    pub fn vivid() -> Self {
        Theme {
            name: "vivid",
            header_accent_bg: Color::Rgb(203, 166, 247),
            header_accent_fg: Color::Rgb(30, 30, 46),
            status_ok: Color::Rgb(166, 227, 161),
            status_err: Color::Rgb(243, 139, 168),
            statusbar_bg: Color::Rgb(49, 50, 68),
            overlay_border: Color::Rgb(69, 71, 90),
            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(166, 173, 200),
            accent: Color::Rgb(203, 166, 247),
            pill_key_bg: Color::Rgb(203, 166, 247),
            pill_key_fg: Color::Rgb(30, 30, 46),
            pill_desc_fg: Color::Rgb(205, 214, 244),
            surface_bg: Color::Rgb(49, 50, 68),
            gauge_filled: Color::Rgb(125, 211, 252),
            gauge_unfilled: Color::Rgb(69, 71, 90),
            chart_primary: Color::Rgb(137, 180, 250),
            chart_secondary: Color::Rgb(250, 179, 135),
            load_colors: [
                Color::Rgb(166, 227, 161),
                Color::Rgb(249, 226, 175),
                Color::Rgb(243, 139, 168),
            ],
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            header_accent_bg: Color::Black,
            header_accent_fg: Color::White,
            status_ok: Color::White,
            status_err: Color::White,
            statusbar_bg: Color::Black,
            overlay_border: Color::White,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            accent: Color::White,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::Black,
            gauge_filled: Color::White,
            gauge_unfilled: Color::Black,
            chart_primary: Color::White,
            chart_secondary: Color::Gray,
            load_colors: [Color::Gray, Color::White, Color::White],
        }
    }
}

fn adapt_color(color: Color, support: ColorSupport) -> Color {
    match support {
        ColorSupport::Truecolor | ColorSupport::Auto => color,
        ColorSupport::Color256 => match color {
            Color::Rgb(r, g, b) => Color::Indexed(rgb_to_ansi256(r, g, b)),
            _ => color,
        },
        ColorSupport::Mono => match color {
            Color::Rgb(r, g, b) => {
                let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
                if luminance > 128.0 {
                    Color::White
                } else {
                    Color::Black
                }
            }
            Color::White | Color::Black | Color::Gray | Color::DarkGray => color,
            _ => Color::White,
        },
    }
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    let r = (r as f32 / 255.0 * 5.0).round() as u8;
    let g = (g as f32 / 255.0 * 5.0).round() as u8;
    let b = (b as f32 / 255.0 * 5.0).round() as u8;
    16 + 36 * r + 6 * g + b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_cycle() {
        let theme = Theme::from_config("dark", ColorSupport::Truecolor);
        let theme = theme.next(ColorSupport::Truecolor);
        assert_eq!(theme.name, "vivid");
        let theme = theme.next(ColorSupport::Truecolor);
        assert_eq!(theme.name, "light");
        let theme = theme.next(ColorSupport::Truecolor);
        assert_eq!(theme.name, "dark");
    }

    #[test]
    fn mono_support_forces_mono_theme() {
        let theme = Theme::from_config("vivid", ColorSupport::Mono);
        assert_eq!(theme.name, "mono");
        assert_eq!(theme.next(ColorSupport::Mono).name, "mono");
    }

    #[test]
    fn unknown_theme_is_dark() {
        assert_eq!(Theme::from_config("solarized", ColorSupport::Truecolor).name, "dark");
    }

    #[test]
    fn color_256_maps_rgb() {
        let theme = Theme::from_config("dark", ColorSupport::Color256);
        assert!(matches!(theme.gauge_filled, Color::Indexed(_)));
        assert_eq!(theme.status_ok, Color::Green);
    }

    #[test]
    fn power_tiers_use_load_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.power_color(PowerTier::Low), theme.load_colors[0]);
        assert_eq!(theme.power_color(PowerTier::High), theme.load_colors[2]);
        assert_eq!(theme.usage_color(10.0), theme.gauge_filled);
        assert_eq!(theme.usage_color(50.0), theme.load_colors[1]);
        assert_eq!(theme.usage_color(95.0), theme.load_colors[2]);
    }

    #[test]
    fn ansi256_conversion() {
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi256(255, 255, 255), 231);
    }
}
