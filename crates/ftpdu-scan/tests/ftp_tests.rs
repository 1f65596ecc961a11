//! FTP transport against a scripted server on the loopback interface.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ftpdu_scan::{
    ConnectConfig, FtpTransport, RemoteAddress, RemoteScanner, ScanConfig, Transport,
    TransportError,
};

/// A single-connection FTP server answering from a fixed directory layout.
#[derive(Clone, Default)]
struct Script {
    /// Directory path to the names `NLST` returns for it.
    dirs: HashMap<String, Vec<String>>,
    sizes: HashMap<String, u64>,
    /// Reply to `NLST` on a directory with no entries.
    empty_reply: Option<&'static str>,
}

impl Script {
    fn dir(mut self, path: &str, names: &[&str]) -> Self {
        let names = names.iter().map(|n| n.to_string()).collect();
        self.dirs.insert(path.to_string(), names);
        self
    }

    fn file(mut self, path: &str, size: u64) -> Self {
        self.sizes.insert(path.to_string(), size);
        self
    }

    fn empty_reply(mut self, reply: &'static str) -> Self {
        self.empty_reply = Some(reply);
        self
    }

    /// Serve one session; the handle yields every command received.
    fn serve(self) -> (u16, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (control, _) = listener.accept().unwrap();
            self.session(control)
        });
        (port, handle)
    }

    fn session(&self, control: TcpStream) -> Vec<String> {
        control.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        let mut reader = BufReader::new(control.try_clone().unwrap());
        let mut out = control;
        let mut send = |line: &str| out.write_all(format!("{line}\r\n").as_bytes()).unwrap();

        let mut commands = Vec::new();
        let mut cwd = "/".to_string();
        // Kept open until the next PASV so a late data connection never races a refusal.
        let mut passive: Option<TcpListener> = None;

        send("220 scripted server ready");
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                break;
            }
            let line = line.trim_end().to_string();
            let (verb, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
            commands.push(line.clone());

            match verb {
                "USER" => send("331 Password required"),
                "PASS" => send("230 Logged in"),
                "PWD" => send(&format!("257 \"{cwd}\" is the current directory")),
                "CWD" if self.dirs.contains_key(arg) => {
                    cwd = arg.to_string();
                    send("250 Directory changed");
                }
                "CWD" => send("550 Not a directory"),
                "TYPE" => send("200 Type set"),
                "SIZE" => match self.sizes.get(arg) {
                    Some(size) => send(&format!("213 {size}")),
                    None => send("550 No such file"),
                },
                "PASV" => {
                    let data = TcpListener::bind("127.0.0.1:0").unwrap();
                    let port = data.local_addr().unwrap().port();
                    passive = Some(data);
                    send(&format!(
                        "227 Entering Passive Mode (127,0,0,1,{},{})",
                        port >> 8,
                        port & 0xff
                    ));
                }
                "NLST" => {
                    let data = passive.as_ref().unwrap();
                    match self.dirs.get(arg) {
                        Some(names) if names.is_empty() && self.empty_reply.is_some() => {
                            send(self.empty_reply.unwrap_or_default());
                        }
                        Some(names) => {
                            send("150 Here comes the listing");
                            let (mut stream, _) = data.accept().unwrap();
                            for name in names {
                                stream.write_all(format!("{name}\r\n").as_bytes()).unwrap();
                            }
                            drop(stream);
                            send("226 Transfer complete");
                        }
                        None => send("550 No such directory"),
                    }
                }
                "QUIT" => {
                    send("221 Bye");
                    break;
                }
                _ => send("502 Command not implemented"),
            }
        }
        commands
    }
}

fn connect(port: u16) -> FtpTransport {
    let address: RemoteAddress = format!("ftp://127.0.0.1:{port}").parse().unwrap();
    let config = ConnectConfig::builder()
        .address(address)
        .username("anonymous")
        .password("guest")
        .connect_timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    FtpTransport::connect(&config).unwrap()
}

fn layout() -> Script {
    Script::default()
        .dir("/", &["empty", "file.txt"])
        .dir("/empty", &[])
        .file("/file.txt", 3)
}

fn scan_empty_folder_with(reply: &'static str) {
    let (port, server) = layout().empty_reply(reply).serve();
    let mut transport = connect(port);

    let tree = RemoteScanner::new()
        .scan(&mut transport, &ScanConfig::new("/"))
        .unwrap();
    transport.close().unwrap();
    server.join().unwrap();

    assert_eq!(tree.total_size(), 3);
    let empty = tree.children(tree.root_id()).next().unwrap();
    assert_eq!(empty.name.as_str(), "empty");
    assert!(empty.is_folder());
    assert_eq!(empty.size, 0);
    assert!(empty.children.is_empty());
}

#[test]
fn test_empty_folder_refused_with_450_scans_as_empty() {
    scan_empty_folder_with("450 No files found");
}

#[test]
fn test_empty_folder_refused_with_550_scans_as_empty() {
    scan_empty_folder_with("550 No files found");
}

#[test]
fn test_binary_mode_is_set_before_size_and_cwd_classifies_entries() {
    let (port, server) = layout().serve();
    let mut transport = connect(port);

    let tree = RemoteScanner::new()
        .scan(&mut transport, &ScanConfig::new("/"))
        .unwrap();
    transport.close().unwrap();
    let commands = server.join().unwrap();

    let file = tree.children(tree.root_id()).nth(1).unwrap();
    assert!(file.is_file());
    assert_eq!(file.size, 3);

    let position = |cmd: &str| commands.iter().position(|c| c == cmd).unwrap();
    assert!(position("CWD /empty") < position("CWD /file.txt"));
    assert!(position("CWD /file.txt") < position("TYPE I"));
    assert!(position("TYPE I") < position("SIZE /file.txt"));
    assert_eq!(commands.last().map(String::as_str), Some("QUIT"));
}

#[test]
fn test_refused_listing_of_missing_folder_is_an_error() {
    let (port, server) = layout().empty_reply("450 No files found").serve();
    let mut transport = connect(port);

    let err = transport.list("/missing").unwrap_err();
    assert!(matches!(err, TransportError::Rejected { .. }));
    // The failed check leaves the working directory alone.
    assert_eq!(transport.current_dir().unwrap(), "/");

    transport.close().unwrap();
    server.join().unwrap();
}

#[test]
fn test_size_of_vanished_file_is_not_found() {
    let (port, server) = layout().serve();
    let mut transport = connect(port);

    assert_eq!(transport.file_size("/gone.txt"), Err(TransportError::NotFound));
    assert_eq!(transport.file_size("/file.txt"), Ok(3));

    transport.close().unwrap();
    server.join().unwrap();
}
