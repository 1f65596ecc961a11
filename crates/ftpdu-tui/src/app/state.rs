//! Application state types.

use ftpdu_core::{NodeId, RemoteTree};
use strum::{Display, EnumIter, FromRepr, IntoEnumIterator};

/// Application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    Help,
    Quit,
}

/// Order of the rows in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, FromRepr)]
pub enum SortMode {
    /// Largest first, ties in listing order.
    #[default]
    #[strum(to_string = "Size ↓")]
    SizeDescending,
    /// Case-insensitive name order.
    #[strum(to_string = "Name")]
    Name,
    /// Order the server listed the entries in.
    #[strum(to_string = "Listing")]
    Listing,
}

impl SortMode {
    /// Cycle to the next sort mode.
    pub fn next(self) -> Self {
        let next = (self as usize + 1) % Self::iter().count();
        Self::from_repr(next).unwrap_or_default()
    }

    /// Children of `folder` in this order.
    pub fn sorted_children(self, tree: &RemoteTree, folder: NodeId) -> Vec<NodeId> {
        match self {
            Self::SizeDescending => tree.sorted_children(folder, |a, b| b.size.cmp(&a.size)),
            Self::Name => tree.sorted_children(folder, |a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            }),
            Self::Listing => tree[folder].children.clone(),
        }
    }
}

/// A folder left by drilling down, with the row that was selected in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub folder: NodeId,
    pub selected: NodeId,
}
