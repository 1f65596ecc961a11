//! Application rendering.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, StatefulWidget, Widget};

use crate::ui::{AppLayout, HelpOverlay, ListingView, format_size};

use super::{App, AppMode};

impl App {
    /// Draw one frame.
    pub(super) fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.render_into(area, frame.buffer_mut());
    }

    fn render_into(&mut self, area: Rect, buf: &mut Buffer) {
        let base_style = Style::default()
            .bg(self.theme.background)
            .fg(self.theme.foreground);
        buf.set_style(area, base_style);

        let layout = AppLayout::new(area);
        self.render_header(layout.header, buf);
        self.render_listing(layout.main, buf);
        self.render_footer(layout.footer, buf);

        if self.mode == AppMode::Help {
            HelpOverlay::new(&self.theme).render(area, buf);
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let folder = &self.tree[self.current];
        let title = Span::styled(" ftpdu ", self.theme.title.add_modifier(Modifier::BOLD));
        let path = Span::styled(
            format!(" {} ", self.tree.path_of(self.current)),
            self.theme.header.add_modifier(Modifier::BOLD),
        );
        let stats = Span::styled(
            format!(
                " {} in {} files, {} folders ",
                format_size(folder.size),
                folder.file_count(),
                folder.folder_count()
            ),
            self.theme.header,
        );

        let line = Line::from(vec![title, path, stats]);
        Paragraph::new(line).style(self.theme.header).render(area, buf);
    }

    fn render_listing(&mut self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(self.theme.border)
            .title(format!(" {} entries, sorted by {} ", self.entries.len(), self.sort))
            .title_style(Style::default().fg(self.theme.muted));
        self.page_size = block.inner(area).height.max(1) as usize;

        let folder_size = self.tree[self.current].size;
        ListingView::new(&self.tree, &self.entries, folder_size, &self.theme)
            .block(block)
            .render(area, buf, &mut self.listing);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let mut keys = vec![("j/k", "Nav"), ("Enter", "Open")];
        if !self.history.is_empty() {
            keys.push(("Bksp", "Back"));
        }
        keys.extend([("s", "Sort"), ("t", "Theme"), ("?", "Help"), ("q", "Quit")]);

        let spans: Vec<Span> = keys
            .iter()
            .flat_map(|(key, desc)| {
                [
                    Span::styled(format!(" {key} "), self.theme.help_key),
                    Span::styled(format!("{desc} "), self.theme.help_desc),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .style(self.theme.footer)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use ftpdu_core::RemoteTree;

    use super::*;
    use crate::event::KeyAction;

    fn screen(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render_into(area, &mut buf);
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    fn app() -> App {
        let mut tree = RemoteTree::new("root");
        tree.root_path = "/srv".to_string();
        let root = tree.root_id();
        let pub_dir = tree.add_folder(root, "pub");
        tree.add_file(pub_dir, "release.tar.gz", 2048);
        tree.complete_folder(pub_dir);
        tree.add_file(root, "README", 1024);
        App::new(tree)
    }

    #[test]
    fn test_header_shows_path_and_total() {
        let mut app = app();
        let rows = screen(&mut app, 80, 10);
        assert!(rows[0].contains("/srv"), "{}", rows[0]);
        assert!(rows[0].contains("3 KiB"), "{}", rows[0]);
        assert!(rows[0].contains("2 files, 1 folders"), "{}", rows[0]);
    }

    #[test]
    fn test_listing_and_footer() {
        let mut app = app();
        let rows = screen(&mut app, 80, 10);
        assert!(rows[2].contains("pub/"), "{}", rows[2]);
        assert!(rows[3].contains("README"), "{}", rows[3]);
        assert!(rows[9].contains("Quit"), "{}", rows[9]);
        assert!(!rows[9].contains("Back"));
        assert_eq!(app.page_size, 7);
    }

    #[test]
    fn test_header_follows_drill_down() {
        let mut app = app();
        app.handle_action(KeyAction::DrillDown);
        let rows = screen(&mut app, 80, 10);
        assert!(rows[0].contains("/srv/pub"), "{}", rows[0]);
        assert!(rows[2].contains("release.tar.gz"), "{}", rows[2]);
        assert!(rows[9].contains("Back"));
    }

    #[test]
    fn test_help_overlay_is_drawn() {
        let mut app = app();
        app.handle_action(KeyAction::ToggleHelp);
        let text = screen(&mut app, 80, 24).concat();
        assert!(text.contains("Open folder"));
    }
}
