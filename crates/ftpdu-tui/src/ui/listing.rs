//! Folder listing widget.

use ftpdu_core::{NodeId, RemoteTree};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, StatefulWidget, Widget};

use crate::theme::Theme;
use crate::ui::{SizeBar, format_size, share, truncate_to_width};

const SIZE_WIDTH: u16 = 10;
const SHARE_WIDTH: u16 = 6;
const BAR_WIDTH: u16 = 12;

/// Selection and scroll position within a listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListingState {
    /// Selected row.
    pub selected: usize,
    /// First visible row.
    pub offset: usize,
}

impl ListingState {
    /// State with `selected` preselected.
    pub fn at(selected: usize) -> Self {
        Self {
            selected,
            offset: 0,
        }
    }

    /// Move selection up.
    pub fn move_up(&mut self, count: usize) {
        self.selected = self.selected.saturating_sub(count);
    }

    /// Move selection down, stopping at the last of `len` rows.
    pub fn move_down(&mut self, count: usize, len: usize) {
        self.selected = (self.selected + count).min(len.saturating_sub(1));
    }

    /// Jump to top.
    pub fn jump_to_top(&mut self) {
        self.selected = 0;
    }

    /// Jump to bottom.
    pub fn jump_to_bottom(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Ensure selected item is visible, adjusting offset if needed.
    pub fn ensure_visible(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + viewport_height {
            self.offset = self.selected + 1 - viewport_height;
        }
    }
}

/// Children of one folder, one row each: size, share of the folder, bar, name.
pub struct ListingView<'a> {
    tree: &'a RemoteTree,
    entries: &'a [NodeId],
    parent_size: u64,
    theme: &'a Theme,
    block: Option<Block<'a>>,
}

impl<'a> ListingView<'a> {
    /// Create a listing of `entries`, all children of a folder of `parent_size` bytes.
    pub fn new(tree: &'a RemoteTree, entries: &'a [NodeId], parent_size: u64, theme: &'a Theme) -> Self {
        Self {
            tree,
            entries,
            parent_size,
            theme,
            block: None,
        }
    }

    /// Set the block (border) for the widget.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl StatefulWidget for ListingView<'_> {
    type State = ListingState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner_area.height == 0 || inner_area.width == 0 {
            return;
        }

        if self.entries.is_empty() {
            let line = Line::from(Span::styled("  (empty folder)", Style::default().fg(self.theme.muted)));
            Widget::render(line, inner_area, buf);
            return;
        }

        let viewport_height = inner_area.height as usize;
        state.ensure_visible(viewport_height);

        let start = state.offset;
        let end = (start + viewport_height).min(self.entries.len());

        let name_x = SIZE_WIDTH + 1 + SHARE_WIDTH + 1 + BAR_WIDTH + 1;
        let name_width = inner_area.width.saturating_sub(name_x) as usize;

        for (row, index) in (start..end).enumerate() {
            let node = &self.tree[self.entries[index]];
            let y = inner_area.y + row as u16;
            let is_selected = index == state.selected;
            let ratio = share(node.size, self.parent_size);

            let mut name = node.name.to_string();
            if node.is_folder() {
                name.push('/');
            }
            let name_style = if node.is_folder() {
                self.theme.folder
            } else {
                self.theme.file
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>width$} ", format_size(node.size), width = SIZE_WIDTH as usize),
                    Style::default().fg(self.theme.foreground),
                ),
                Span::styled(
                    format!("{:>width$.1}% ", ratio * 100.0, width = SHARE_WIDTH as usize - 1),
                    Style::default().fg(self.theme.muted),
                ),
                Span::raw(" ".repeat(BAR_WIDTH as usize + 1)),
                Span::styled(truncate_to_width(&name, name_width), name_style),
            ]);
            let line = if is_selected {
                line.style(self.theme.selected)
            } else {
                line
            };
            Widget::render(line, Rect::new(inner_area.x, y, inner_area.width, 1), buf);

            let bar_x = inner_area.x + SIZE_WIDTH + 1 + SHARE_WIDTH + 1;
            if bar_x + BAR_WIDTH <= inner_area.x + inner_area.width {
                SizeBar::new(ratio)
                    .filled_style(self.theme.size_bar_style(ratio))
                    .empty_style(Style::default().fg(self.theme.muted))
                    .render(Rect::new(bar_x, y, BAR_WIDTH, 1), buf);
            }
        }
    }
}
