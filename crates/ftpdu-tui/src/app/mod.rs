//! Main application state and logic.

mod render;
mod state;

pub use state::{AppMode, HistoryEntry, SortMode};

use crossterm::event::{self, Event, KeyEventKind};
use ftpdu_core::{NodeId, RemoteTree};
use ratatui::DefaultTerminal;

use crate::event::KeyAction;
use crate::theme::Theme;
use crate::ui::ListingState;

/// Result type for the application.
pub type AppResult<T> = color_eyre::Result<T>;

/// Rows moved by a page key before the first frame reports the real height.
const DEFAULT_PAGE_SIZE: usize = 10;

/// Interactive browser over a finished scan.
#[derive(Debug)]
pub struct App {
    tree: RemoteTree,
    /// Folder whose children are listed.
    current: NodeId,
    /// Children of `current` in display order.
    entries: Vec<NodeId>,
    listing: ListingState,
    history: Vec<HistoryEntry>,
    sort: SortMode,
    theme: Theme,
    mode: AppMode,
    page_size: usize,
}

impl App {
    /// Create an app positioned at the root of `tree`.
    pub fn new(tree: RemoteTree) -> Self {
        let current = tree.root_id();
        let sort = SortMode::default();
        let entries = sort.sorted_children(&tree, current);
        Self {
            tree,
            current,
            entries,
            listing: ListingState::default(),
            history: Vec::new(),
            sort,
            theme: Theme::default(),
            mode: AppMode::Normal,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Run the event loop until the user quits.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        while self.mode != AppMode::Quit {
            terminal.draw(|frame| self.render(frame))?;

            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    self.handle_action(KeyAction::from_key_event(key_event));
                }
            }
        }
        Ok(())
    }

    /// Apply one key action.
    pub fn handle_action(&mut self, action: KeyAction) {
        if action == KeyAction::ForceQuit || action == KeyAction::Quit {
            self.mode = AppMode::Quit;
            return;
        }

        if self.mode == AppMode::Help {
            if matches!(action, KeyAction::ToggleHelp | KeyAction::Cancel) {
                self.mode = AppMode::Normal;
            }
            return;
        }

        let len = self.entries.len();
        match action {
            KeyAction::MoveUp => self.listing.move_up(1),
            KeyAction::MoveDown => self.listing.move_down(1, len),
            KeyAction::JumpToTop => self.listing.jump_to_top(),
            KeyAction::JumpToBottom => self.listing.jump_to_bottom(len),
            KeyAction::PageUp => self.listing.move_up(self.page_size),
            KeyAction::PageDown => self.listing.move_down(self.page_size, len),
            KeyAction::DrillDown => self.drill_down(),
            KeyAction::NavigateBack => self.navigate_back(),
            KeyAction::Sort => self.cycle_sort(),
            KeyAction::ToggleTheme => self.theme = self.theme.toggle(),
            KeyAction::ToggleHelp => self.mode = AppMode::Help,
            KeyAction::Cancel => self.mode = AppMode::Quit,
            KeyAction::Quit | KeyAction::ForceQuit | KeyAction::None => {}
        }
    }

    /// The scanned tree.
    pub fn tree(&self) -> &RemoteTree {
        &self.tree
    }

    /// Folder currently listed.
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Node under the cursor, if the folder has any children.
    pub fn selected(&self) -> Option<NodeId> {
        self.entries.get(self.listing.selected).copied()
    }

    /// Rows of the current listing in display order.
    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    /// Active sort order.
    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    /// Active theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Current mode.
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    fn drill_down(&mut self) {
        let Some(target) = self.selected() else {
            return;
        };
        if !self.tree[target].is_folder() {
            return;
        }

        self.history.push(HistoryEntry {
            folder: self.current,
            selected: target,
        });
        self.show_folder(target, None);
    }

    fn navigate_back(&mut self) {
        if let Some(entry) = self.history.pop() {
            self.show_folder(entry.folder, Some(entry.selected));
        }
    }

    fn cycle_sort(&mut self) {
        let keep = self.selected();
        self.sort = self.sort.next();
        self.show_folder(self.current, keep);
    }

    /// List `folder`, placing the cursor on `select` when it is one of its rows.
    fn show_folder(&mut self, folder: NodeId, select: Option<NodeId>) {
        self.current = folder;
        self.entries = self.sort.sorted_children(&self.tree, folder);
        let row = select
            .and_then(|id| self.entries.iter().position(|e| *e == id))
            .unwrap_or(0);
        self.listing = ListingState::at(row);
        tracing::trace!(folder = folder.index(), row, "showing folder");
    }
}
