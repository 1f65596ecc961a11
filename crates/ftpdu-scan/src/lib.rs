//! Remote scanning engine for ftpdu.
//!
//! This crate walks an FTP or SFTP server and builds a size-annotated
//! [`RemoteTree`].
//!
//! # Overview
//!
//! - **Transports** behind one [`Transport`] trait: plain FTP, where folders
//!   are recognised by trying to enter them, and SFTP, which has a real stat
//! - **Depth-first scanning** with bottom-up size aggregation
//! - **Fail-fast** error handling: one failed request aborts the scan
//! - **Progress updates** through a [`ProgressReporter`]
//!
//! # Example
//!
//! ```rust,no_run
//! use ftpdu_scan::{ConnectConfig, RemoteScanner, ScanConfig, StatusLine, connect};
//!
//! let config = ConnectConfig::builder()
//!     .address("sftp://files.example.org".parse::<ftpdu_scan::RemoteAddress>().unwrap())
//!     .username("alice")
//!     .password("secret")
//!     .build()
//!     .unwrap();
//!
//! let mut transport = connect(&config).unwrap();
//! let mut scanner = RemoteScanner::with_reporter(StatusLine::new(std::io::stderr()));
//! let tree = scanner.scan(&mut transport, &ScanConfig::default()).unwrap();
//!
//! println!("Total size: {} bytes", tree.total_size());
//! ```

mod address;
mod ftp;
mod memory;
mod progress;
mod scanner;
mod session;
#[cfg(feature = "sftp")]
mod sftp;
mod transport;

pub use address::{RemoteAddress, Scheme};
pub use ftp::FtpTransport;
pub use memory::{MemoryTransport, Probe};
pub use progress::{
    DEFAULT_MARGIN, DEFAULT_WIDTH, NoProgress, ProgressReporter, ScanProgress, StatusLine,
    fit_to_width,
};
pub use scanner::RemoteScanner;
pub use session::{ConnectConfig, ConnectConfigBuilder, connect};
#[cfg(feature = "sftp")]
pub use sftp::SftpTransport;
pub use transport::Transport;

// Re-export core types for convenience
pub use ftpdu_core::{
    ConnectError, NodeId, NodeKind, RemoteNode, RemoteTree, ScanConfig, ScanError,
    TransportError, TreeStats, UsageError,
};
