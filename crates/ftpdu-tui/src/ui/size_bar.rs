//! Size bar widget for visualizing a share of the parent folder.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

/// A horizontal bar filled in proportion to `ratio`.
pub struct SizeBar {
    ratio: f64,
    filled_style: Style,
    empty_style: Style,
}

impl SizeBar {
    const FILLED: char = '█';
    const EMPTY: char = '░';

    /// Create a new size bar; `ratio` is clamped to `0.0..=1.0`.
    pub fn new(ratio: f64) -> Self {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        Self {
            ratio,
            filled_style: Style::default(),
            empty_style: Style::default(),
        }
    }

    /// Set the style for the filled portion.
    pub fn filled_style(mut self, style: Style) -> Self {
        self.filled_style = style;
        self
    }

    /// Set the style for the empty portion.
    pub fn empty_style(mut self, style: Style) -> Self {
        self.empty_style = style;
        self
    }
}

impl Widget for SizeBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let filled_width = (area.width as f64 * self.ratio).round() as u16;

        for x in 0..area.width {
            let (symbol, style) = if x < filled_width {
                (Self::FILLED, self.filled_style)
            } else {
                (Self::EMPTY, self.empty_style)
            };

            buf[(area.x + x, area.y)].set_char(symbol).set_style(style);
        }
    }
}
