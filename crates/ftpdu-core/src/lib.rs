//! Core types for ftpdu.
//!
//! This crate provides the data structures shared by the scanner and the
//! browser: the arena-backed remote tree, its nodes, scan configuration,
//! error types and helpers for slash-separated remote paths.

mod config;
mod error;
mod node;
pub mod path;
mod tree;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{ConnectError, ScanError, TransportError, UsageError};
pub use node::{NodeId, NodeKind, RemoteNode};
pub use tree::{RemoteTree, TreeStats};
