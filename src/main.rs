//! ftpdu - disk usage analyzer for FTP and SFTP servers.
//!
//! Usage:
//!   ftpdu -H sftp://files.example.org -u alice -p secret      Browse in the TUI
//!   ftpdu -H ftp.example.org/pub -u anonymous -p guest --print  Print a summary
//!   ftpdu --help                                                Show help

use std::io::{self, IsTerminal};
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use ftpdu_core::{NodeId, RemoteTree};
use ftpdu_scan::{
    ConnectConfig, RemoteAddress, RemoteScanner, ScanConfig, StatusLine, Transport, connect,
};

#[derive(Parser)]
#[command(
    name = "ftpdu",
    version,
    about = "Disk usage analyzer for FTP and SFTP servers",
    long_about = "ftpdu walks a remote server over FTP or SFTP, adds up the size of every \
                  folder and lets you browse the result.\n\n\
                  The address scheme picks the protocol: sftp://host for SFTP, \
                  ftp://host or a bare host for FTP. A path after the host is scanned \
                  instead of the login directory."
)]
struct Cli {
    /// Server address: [sftp://|ftp://]host[:port][/path]
    #[arg(short = 'H', long, value_name = "ADDR")]
    host: RemoteAddress,

    /// Login name
    #[arg(short, long)]
    user: String,

    /// Login password
    #[arg(short, long)]
    password: String,

    /// Remote folder to scan (overrides a path given in the address)
    #[arg(short, long)]
    root: Option<String>,

    /// Do not show the scanning status line
    #[arg(long)]
    no_progress: bool,

    /// Print a summary instead of opening the browser
    #[arg(long)]
    print: bool,

    /// Maximum depth to print
    #[arg(short, long, default_value = "3", requires = "print")]
    depth: u32,

    /// Number of largest entries to print per folder
    #[arg(short = 'n', long, default_value = "10", requires = "print")]
    top: usize,

    /// Connection timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();

    let root = cli
        .root
        .clone()
        .or_else(|| cli.host.path.clone())
        .unwrap_or_default();
    let scan_config = ScanConfig::builder()
        .root(root)
        .build()
        .context("Invalid scan configuration")?;

    let connect_config = ConnectConfig::builder()
        .address(cli.host.clone())
        .username(cli.user)
        .password(cli.password)
        .connect_timeout(Duration::from_secs(cli.timeout))
        .build()
        .context("Invalid connection settings")?;

    eprintln!("Connecting to {}...", cli.host);
    let mut transport = connect(&connect_config)
        .with_context(|| format!("Could not open a session with {}", cli.host))?;

    // Logs go to stderr, so the status line gets stdout to itself.
    let result = if show_progress(cli.no_progress, io::stdout().is_terminal()) {
        RemoteScanner::with_reporter(StatusLine::new(io::stdout())).scan(&mut transport, &scan_config)
    } else {
        RemoteScanner::new().scan(&mut transport, &scan_config)
    };
    if let Err(err) = transport.close() {
        tracing::warn!(error = %err, "failed to close the session cleanly");
    }
    let tree = result.context("Scan failed")?;

    if cli.print {
        print_summary(&tree, cli.depth, cli.top);
        Ok(())
    } else {
        ftpdu_tui::run(tree)
    }
}

/// The status line is only drawn on an interactive stdout.
fn show_progress(no_progress: bool, stdout_is_terminal: bool) -> bool {
    !no_progress && stdout_is_terminal
}

/// Log to stderr, filtered by `RUST_LOG` (warnings by default).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_summary(tree: &RemoteTree, max_depth: u32, top_n: usize) {
    println!("{}", "─".repeat(60));
    println!(" {} - {}", tree.root_path, format_size(tree.total_size()));
    println!(
        " {} files, {} folders",
        tree.total_files(),
        tree.total_folders()
    );
    if let Some((path, size)) = &tree.stats.largest_file {
        println!(" Largest file: {} ({})", path, format_size(*size));
    }
    println!(" Scanned in {:.2}s", tree.scan_duration.as_secs_f64());
    println!("{}", "─".repeat(60));
    println!();

    print_node(tree, tree.root_id(), 0, max_depth, top_n, tree.total_size());
}

/// Print a node and, down to `max_depth`, its largest children.
fn print_node(tree: &RemoteTree, id: NodeId, depth: u32, max_depth: u32, top_n: usize, root_size: u64) {
    let node = &tree[id];
    let indent = "  ".repeat(depth as usize);
    let ratio = if root_size > 0 {
        node.size as f64 / root_size as f64 * 100.0
    } else {
        0.0
    };

    let name = if depth == 0 {
        tree.root_path.clone()
    } else if node.is_folder() {
        format!("{}/", node.name)
    } else {
        node.name.to_string()
    };

    println!(
        "{}{}{:<40} {:>10} {:>5.1}% {}",
        indent,
        if node.is_folder() { "▼ " } else { "  " },
        truncate(&name, 40),
        format_size(node.size),
        ratio,
        make_bar(ratio / 100.0, 10)
    );

    if node.is_folder() && depth < max_depth {
        let children = tree.sorted_children(id, |a, b| b.size.cmp(&a.size));
        let remaining = children.len().saturating_sub(top_n);

        for child in children.into_iter().take(top_n) {
            print_node(tree, child, depth + 1, max_depth, top_n, root_size);
        }

        if remaining > 0 {
            let indent = "  ".repeat((depth + 1) as usize);
            println!("{}  ... and {} more", indent, remaining);
        }
    }
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to at most `max_chars` characters.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
