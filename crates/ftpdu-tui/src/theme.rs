//! Color theme for the TUI.
//!
//! Each variant is a small [`Palette`] of raw colors; [`Theme`] turns it into
//! the styles the header, listing, footer and help popup draw with.

use ratatui::style::{Color, Modifier, Style};

/// Share of the folder at or above which an entry moves up the size scale.
const SHARE_STEPS: [f64; 4] = [0.50, 0.25, 0.10, 0.01];

/// Theme variant (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Raw colors of one variant.
#[derive(Debug, Clone, Copy)]
struct Palette {
    canvas: Color,
    panel: Color,
    text: Color,
    dim: Color,
    line: Color,
    highlight: Color,
    accent: Color,
    folder: Color,
    /// Largest share first.
    scale: [Color; 5],
}

const DARK: Palette = Palette {
    canvas: Color::Rgb(17, 24, 28),
    panel: Color::Rgb(29, 40, 46),
    text: Color::Rgb(226, 232, 234),
    dim: Color::Rgb(110, 128, 136),
    line: Color::Rgb(58, 74, 82),
    highlight: Color::Rgb(44, 62, 72),
    accent: Color::Rgb(45, 212, 191),
    folder: Color::Rgb(94, 196, 232),
    scale: [
        Color::Rgb(244, 96, 96),
        Color::Rgb(246, 150, 70),
        Color::Rgb(234, 200, 80),
        Color::Rgb(120, 200, 120),
        Color::Rgb(76, 96, 104),
    ],
};

const LIGHT: Palette = Palette {
    canvas: Color::Rgb(250, 250, 247),
    panel: Color::Rgb(234, 238, 236),
    text: Color::Rgb(24, 32, 36),
    dim: Color::Rgb(104, 116, 120),
    line: Color::Rgb(176, 188, 190),
    highlight: Color::Rgb(214, 226, 228),
    accent: Color::Rgb(13, 128, 116),
    folder: Color::Rgb(18, 104, 160),
    scale: [
        Color::Rgb(196, 40, 40),
        Color::Rgb(204, 96, 20),
        Color::Rgb(164, 120, 0),
        Color::Rgb(40, 140, 60),
        Color::Rgb(160, 170, 172),
    ],
};

/// Styles used across the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub variant: ThemeVariant,

    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub info: Color,

    /// Highlighted listing row.
    pub selected: Style,
    pub folder: Style,
    pub file: Style,
    /// Bar colors by share of the folder, largest first.
    pub size_scale: [Color; 5],

    pub border: Style,
    pub title: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub header: Style,
    pub footer: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self::from_palette(ThemeVariant::Dark, DARK)
    }

    pub fn light() -> Self {
        Self::from_palette(ThemeVariant::Light, LIGHT)
    }

    fn from_palette(variant: ThemeVariant, p: Palette) -> Self {
        let bold = Modifier::BOLD;
        Self {
            variant,
            background: p.canvas,
            foreground: p.text,
            muted: p.dim,
            info: p.accent,
            selected: Style::new().bg(p.highlight).fg(p.text).add_modifier(bold),
            folder: Style::new().fg(p.folder).add_modifier(bold),
            file: Style::new().fg(p.text),
            size_scale: p.scale,
            border: Style::new().fg(p.line),
            title: Style::new().fg(p.accent).add_modifier(bold),
            help_key: Style::new().fg(p.accent).add_modifier(bold),
            help_desc: Style::new().fg(p.dim),
            header: Style::new().bg(p.panel).fg(p.text),
            footer: Style::new().bg(p.panel).fg(p.dim),
        }
    }

    /// Switch to the other variant.
    pub fn toggle(&self) -> Self {
        match self.variant {
            ThemeVariant::Dark => Self::light(),
            ThemeVariant::Light => Self::dark(),
        }
    }

    /// Color for an entry holding `share` (0.0 to 1.0) of its folder.
    pub fn size_color(&self, share: f64) -> Color {
        let step = SHARE_STEPS
            .iter()
            .position(|min| share > *min)
            .unwrap_or(SHARE_STEPS.len());
        self.size_scale[step]
    }

    pub fn size_bar_style(&self, share: f64) -> Style {
        Style::new().fg(self.size_color(share))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        let theme = Theme::default();
        assert_eq!(theme.variant, ThemeVariant::Dark);
        assert_eq!(theme.toggle().variant, ThemeVariant::Light);
        assert_eq!(theme.toggle().toggle().variant, ThemeVariant::Dark);
    }

    #[test]
    fn test_size_color_follows_share() {
        let theme = Theme::dark();
        let scale = theme.size_scale;
        assert_eq!(theme.size_color(0.9), scale[0]);
        assert_eq!(theme.size_color(0.3), scale[1]);
        assert_eq!(theme.size_color(0.2), scale[2]);
        assert_eq!(theme.size_color(0.05), scale[3]);
        assert_eq!(theme.size_color(0.01), scale[4]);
        assert_eq!(theme.size_color(0.0), scale[4]);
        assert_eq!(theme.size_color(f64::NAN), scale[4]);
    }

    #[test]
    fn test_variants_differ() {
        assert_ne!(Theme::dark().background, Theme::light().background);
        assert_ne!(Theme::dark().size_scale, Theme::light().size_scale);
    }
}
