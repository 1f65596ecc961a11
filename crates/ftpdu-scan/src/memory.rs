//! In-memory transport.
//!
//! Behaves like an FTP connection: probing a folder moves the working
//! directory into it, probing anything else leaves it alone. Every probe is
//! logged together with the working directory it observed, which makes the
//! save/restore discipline of the scanner checkable.

use std::collections::HashSet;

use ftpdu_core::{TransportError, path};
use indexmap::IndexMap;

use crate::address::Scheme;
use crate::transport::Transport;

#[derive(Debug, Clone)]
enum MemoryEntry {
    Folder(Vec<String>),
    File(u64),
}

/// A probe observed by a [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// Path that was probed.
    pub path: String,
    /// Working directory at the time of the probe.
    pub cwd: String,
}

/// Transport serving a hierarchy held in memory.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    entries: IndexMap<String, MemoryEntry>,
    cwd: String,
    qualified_listings: bool,
    failing_listings: HashSet<String>,
    probes: Vec<Probe>,
    closed: bool,
}

impl MemoryTransport {
    /// Create a transport holding only an empty `/`.
    pub fn new() -> Self {
        let mut entries = IndexMap::new();
        entries.insert("/".to_string(), MemoryEntry::Folder(Vec::new()));
        Self {
            entries,
            cwd: "/".to_string(),
            qualified_listings: false,
            failing_listings: HashSet::new(),
            probes: Vec::new(),
            closed: false,
        }
    }

    /// Set the login directory, creating it if needed.
    pub fn with_home(mut self, home: &str) -> Self {
        self.add_folder(home);
        self.cwd = normalize("/", home);
        self
    }

    /// Return path-qualified names from listings instead of bare names.
    pub fn with_qualified_listings(mut self, qualified: bool) -> Self {
        self.qualified_listings = qualified;
        self
    }

    /// Add a folder, creating missing parents.
    pub fn add_folder(&mut self, dir: &str) -> &mut Self {
        let dir = normalize("/", dir);
        if !self.entries.contains_key(&dir) {
            self.link_to_parent(&dir);
            self.entries.insert(dir, MemoryEntry::Folder(Vec::new()));
        }
        self
    }

    /// Add a file, creating missing parents.
    pub fn add_file(&mut self, file: &str, size: u64) -> &mut Self {
        let file = normalize("/", file);
        self.link_to_parent(&file);
        self.entries.insert(file, MemoryEntry::File(size));
        self
    }

    /// List a name in its parent without backing it with an entry.
    ///
    /// Such an entry cannot be entered or sized, like a file deleted between
    /// the listing and the size query.
    pub fn add_phantom(&mut self, entry: &str) -> &mut Self {
        let entry = normalize("/", entry);
        self.link_to_parent(&entry);
        self
    }

    /// Make listing `dir` fail as if the connection dropped.
    pub fn fail_listing(&mut self, dir: &str) -> &mut Self {
        self.failing_listings.insert(normalize("/", dir));
        self
    }

    /// Probes performed so far, in order.
    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// The working directory.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Whether [`Transport::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn link_to_parent(&mut self, entry: &str) {
        let Some(parent) = parent_of(entry) else {
            return;
        };
        self.add_folder(&parent);

        let name = path::base_name(entry).to_string();
        if let Some(MemoryEntry::Folder(children)) = self.entries.get_mut(&parent) {
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn scheme(&self) -> Scheme {
        Scheme::Ftp
    }

    fn list(&mut self, dir: &str) -> Result<Vec<String>, TransportError> {
        let dir = normalize(&self.cwd, dir);
        if self.failing_listings.contains(&dir) {
            return Err(TransportError::connection("connection reset by peer"));
        }
        match self.entries.get(&dir) {
            Some(MemoryEntry::Folder(children)) if self.qualified_listings => {
                Ok(children.iter().map(|name| path::join(&dir, name)).collect())
            }
            Some(MemoryEntry::Folder(children)) => Ok(children.clone()),
            Some(MemoryEntry::File(_)) => Err(TransportError::rejected("550 Not a directory")),
            None => Err(TransportError::NotFound),
        }
    }

    fn probe_is_container(&mut self, target: &str) -> Result<bool, TransportError> {
        let target = normalize(&self.cwd, target);
        self.probes.push(Probe {
            path: target.clone(),
            cwd: self.cwd.clone(),
        });
        match self.entries.get(&target) {
            Some(MemoryEntry::Folder(_)) => {
                self.cwd = target;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn file_size(&mut self, target: &str) -> Result<u64, TransportError> {
        match self.entries.get(&normalize(&self.cwd, target)) {
            Some(MemoryEntry::File(size)) => Ok(*size),
            Some(MemoryEntry::Folder(_)) => Err(TransportError::rejected("550 Is a directory")),
            None => Err(TransportError::NotFound),
        }
    }

    fn current_dir(&mut self) -> Result<String, TransportError> {
        Ok(self.cwd.clone())
    }

    fn change_dir(&mut self, dir: &str) -> Result<(), TransportError> {
        let dir = normalize(&self.cwd, dir);
        match self.entries.get(&dir) {
            Some(MemoryEntry::Folder(_)) => {
                self.cwd = dir;
                Ok(())
            }
            Some(MemoryEntry::File(_)) => Err(TransportError::rejected("550 Not a directory")),
            None => Err(TransportError::NotFound),
        }
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        Ok(())
    }
}

/// Absolute form of `target` without trailing slashes.
fn normalize(cwd: &str, target: &str) -> String {
    let resolved = path::resolve(cwd, target);
    let trimmed = resolved.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn parent_of(entry: &str) -> Option<String> {
    if entry == "/" {
        return None;
    }
    match entry.rsplit_once('/') {
        Some(("", _)) => Some("/".to_string()),
        Some((parent, _)) => Some(parent.to_string()),
        None => Some("/".to_string()),
    }
}
