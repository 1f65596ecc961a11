//! Depth-first remote scanner.

use ftpdu_core::{NodeId, RemoteTree, ScanConfig, ScanError, path};
use tracing::{debug, info};

use crate::progress::{NoProgress, ProgressReporter, ProgressTracker};
use crate::transport::Transport;

/// Walks a remote hierarchy through a [`Transport`] and builds a [`RemoteTree`].
///
/// The walk is sequential and fails fast: the first transport error aborts
/// the whole scan and no tree is returned.
pub struct RemoteScanner<R = NoProgress> {
    reporter: R,
}

/// State threaded through one scan.
struct ScanContext<'a, T: ?Sized> {
    transport: &'a mut T,
    config: &'a ScanConfig,
    tree: RemoteTree,
    tracker: ProgressTracker,
}

impl RemoteScanner<NoProgress> {
    /// Create a scanner that reports no progress.
    pub fn new() -> Self {
        Self {
            reporter: NoProgress,
        }
    }
}

impl<R: ProgressReporter> RemoteScanner<R> {
    /// Create a scanner reporting to `reporter`.
    pub fn with_reporter(reporter: R) -> Self {
        Self { reporter }
    }

    /// Consume the scanner, returning the reporter.
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Scan the hierarchy below `config.root`.
    ///
    /// The root folder is named `config.root_name` and has no parent. Its
    /// top-level entries are handled exactly like nested ones.
    pub fn scan<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        config: &ScanConfig,
    ) -> Result<RemoteTree, ScanError> {
        if config.root_name.is_empty() {
            return Err(ScanError::InvalidConfig {
                message: "Root name cannot be empty".to_string(),
            });
        }

        let login_dir = transport
            .current_dir()
            .map_err(|e| ScanError::transport(&config.root, e))?;
        // Paths handed to the transport must stay valid after it changes
        // directory, so resolve the root once up front.
        let root_path = path::resolve(&login_dir, &config.root);

        let mut ctx = ScanContext {
            transport,
            config,
            tree: RemoteTree::new(config.root_name.as_str()),
            tracker: ProgressTracker::new(),
        };
        ctx.tree.root_path = root_path.clone();

        info!(scheme = %ctx.transport.scheme(), root = %root_path, "starting remote scan");
        let root = ctx.tree.root_id();
        let result = self.scan_folder(&mut ctx, &root_path, root, 0);
        self.reporter.finish();
        result?;

        let mut tree = ctx.tree;
        tree.scan_duration = ctx.tracker.elapsed();
        info!(
            files = tree.stats.total_files,
            folders = tree.stats.total_folders,
            bytes = tree.stats.total_size,
            elapsed_ms = tree.scan_duration.as_millis() as u64,
            "remote scan complete"
        );
        Ok(tree)
    }

    /// Fill `folder` with the entries listed under `dir`.
    fn scan_folder<T: Transport + ?Sized>(
        &mut self,
        ctx: &mut ScanContext<'_, T>,
        dir: &str,
        folder: NodeId,
        depth: u32,
    ) -> Result<(), ScanError> {
        let entries = ctx
            .transport
            .list(dir)
            .map_err(|e| ScanError::transport(dir, e))?;
        debug!(dir, entries = entries.len(), "listed folder");

        if entries.is_empty() {
            return Ok(());
        }

        // Probing a container moves the working directory; every sibling must
        // be probed from the same place.
        let saved_dir = ctx
            .transport
            .current_dir()
            .map_err(|e| ScanError::transport(dir, e))?;

        for entry in &entries {
            let name = path::base_name(entry);
            if ctx.config.should_skip(name) {
                continue;
            }
            let child_path = path::join(dir, name);

            self.reporter.report(ctx.tracker.visit(&child_path));

            let is_container = ctx
                .transport
                .probe_is_container(&child_path)
                .map_err(|e| ScanError::transport(&child_path, e))?;

            if is_container {
                let child = ctx.tree.add_folder(folder, name);
                ctx.tracker.record_folder();
                ctx.tree.stats.record_folder(depth + 1);

                self.scan_folder(ctx, &child_path, child, depth + 1)?;

                ctx.transport
                    .change_dir(&saved_dir)
                    .map_err(|e| ScanError::transport(&saved_dir, e))?;
                ctx.tree.complete_folder(child);
            } else {
                let size = ctx
                    .transport
                    .file_size(&child_path)
                    .map_err(|e| ScanError::transport(&child_path, e))?;
                ctx.tree.add_file(folder, name, size);
                ctx.tracker.record_file(size);
                ctx.tree.stats.record_file(&child_path, size, depth + 1);
            }
        }

        Ok(())
    }
}

impl Default for RemoteScanner<NoProgress> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;
    use ftpdu_core::TransportError;

    fn scan(transport: &mut MemoryTransport, root: &str) -> Result<RemoteTree, ScanError> {
        RemoteScanner::new().scan(transport, &ScanConfig::new(root))
    }

    #[test]
    fn test_flat_folder() {
        let mut transport = MemoryTransport::new();
        transport.add_file("/a", 10).add_file("/b", 20);

        let tree = scan(&mut transport, "/").unwrap();

        assert_eq!(tree.total_size(), 30);
        let children: Vec<_> = tree
            .children(tree.root_id())
            .map(|n| (n.name.to_string(), n.size, n.is_file()))
            .collect();
        assert_eq!(
            children,
            [("a".to_string(), 10, true), ("b".to_string(), 20, true)]
        );
    }

    #[test]
    fn test_nested_folder() {
        let mut transport = MemoryTransport::new();
        transport.add_file("/sub/x", 5);

        let tree = scan(&mut transport, "/").unwrap();

        assert_eq!(tree.total_size(), 5);
        let sub = tree.children(tree.root_id()).next().unwrap();
        assert!(sub.is_folder());
        assert_eq!(sub.name.as_str(), "sub");
        assert_eq!(sub.size, 5);
        let x = tree.children(sub.id).next().unwrap();
        assert_eq!((x.name.as_str(), x.size), ("x", 5));
        assert_eq!(x.parent, Some(sub.id));
    }

    #[test]
    fn test_vanished_entry_fails_scan() {
        let mut transport = MemoryTransport::new();
        transport.add_file("/ok", 1).add_phantom("/ghost");

        let err = scan(&mut transport, "/").unwrap_err();
        match err {
            ScanError::Transport { path, source } => {
                assert_eq!(path, "/ghost");
                assert_eq!(source, TransportError::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_folder() {
        let mut transport = MemoryTransport::new();
        let tree = scan(&mut transport, "/").unwrap();
        assert_eq!(tree.total_size(), 0);
        assert!(tree.root().children.is_empty());
    }

    #[test]
    fn test_empty_root_name_is_rejected() {
        let mut transport = MemoryTransport::new();
        let config = ScanConfig {
            root_name: String::new(),
            ..ScanConfig::default()
        };
        let err = RemoteScanner::new().scan(&mut transport, &config).unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig { .. }));
    }
}
