//! Plain FTP transport.
//!
//! FTP has no portable way to ask whether a path is a directory, so the probe
//! is done by side effect: a successful `CWD` means "folder", a refused one
//! means "file". The probe therefore moves the connection's working directory,
//! which the scanner restores after each descent.
//!
//! Many servers answer `NLST` on an empty directory with a 450 or 550 reply
//! instead of an empty listing. Such a reply counts as an empty listing when
//! the directory can be entered.

use std::net::ToSocketAddrs;

use ftpdu_core::{ConnectError, TransportError};
use suppaftp::types::FileType;
use suppaftp::types::Response;
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, info, warn};

use crate::address::Scheme;
use crate::session::ConnectConfig;
use crate::transport::Transport;

/// Transport backed by a plain FTP control connection.
pub struct FtpTransport {
    stream: FtpStream,
    /// Last directory entered with a successful `CWD`.
    entered: Option<String>,
}

impl FtpTransport {
    /// Connect and log in.
    pub fn connect(config: &ConnectConfig) -> Result<Self, ConnectError> {
        let address = config.address.socket_addr();
        let unreachable = |message: String| ConnectError::Unreachable {
            address: address.clone(),
            message,
        };

        let socket = address
            .to_socket_addrs()
            .map_err(|e| unreachable(e.to_string()))?
            .next()
            .ok_or_else(|| unreachable("host name resolved to no address".to_string()))?;

        debug!(%address, "connecting to FTP server");
        let mut stream = FtpStream::connect_timeout(socket, config.connect_timeout)
            .map_err(|e| unreachable(e.to_string()))?;

        stream
            .login(config.username.as_str(), config.password.as_str())
            .map_err(|e| match e {
                FtpError::UnexpectedResponse(_) => ConnectError::AuthenticationFailed {
                    user: config.username.clone(),
                },
                FtpError::ConnectionError(io) => unreachable(io.to_string()),
                other => ConnectError::Protocol {
                    message: other.to_string(),
                },
            })?;

        info!(%address, user = %config.username, "logged in to FTP server");
        Ok(Self {
            stream,
            entered: None,
        })
    }

    /// Whether `path` is a directory the server lets us enter.
    ///
    /// Leaves the working directory where it was.
    fn can_enter(&mut self, path: &str) -> Result<bool, TransportError> {
        if self.entered.as_deref() == Some(path) {
            return Ok(true);
        }
        let here = self.stream.pwd().map_err(map_ftp_error)?;
        match self.stream.cwd(path) {
            Ok(()) => {
                self.change_dir(&here)?;
                Ok(true)
            }
            Err(err) => match map_ftp_error(err) {
                err if err.is_connection_lost() => Err(err),
                _ => Ok(false),
            },
        }
    }
}

impl Transport for FtpTransport {
    fn scheme(&self) -> Scheme {
        Scheme::Ftp
    }

    fn list(&mut self, path: &str) -> Result<Vec<String>, TransportError> {
        match self.stream.nlst(Some(path)) {
            Ok(names) => Ok(names),
            Err(FtpError::UnexpectedResponse(response)) if is_empty_listing_reply(&response) => {
                if self.can_enter(path)? {
                    let status = response.status.code();
                    debug!(path, status, "NLST refused on a directory, treating it as empty");
                    Ok(Vec::new())
                } else {
                    Err(map_ftp_error(FtpError::UnexpectedResponse(response)))
                }
            }
            Err(err) => Err(map_ftp_error(err)),
        }
    }

    fn probe_is_container(&mut self, path: &str) -> Result<bool, TransportError> {
        match self.stream.cwd(path) {
            Ok(()) => {
                self.entered = Some(path.to_string());
                Ok(true)
            }
            Err(err) => match map_ftp_error(err) {
                err if err.is_connection_lost() => Err(err),
                err @ TransportError::Protocol { .. } => {
                    // The size query that follows surfaces a real fault.
                    warn!(path, error = %err, "unexpected CWD failure, treating entry as a file");
                    Ok(false)
                }
                err => {
                    debug!(path, error = %err, "CWD refused, treating entry as a file");
                    Ok(false)
                }
            },
        }
    }

    fn file_size(&mut self, path: &str) -> Result<u64, TransportError> {
        // SIZE is refused in ASCII mode by many servers.
        self.stream
            .transfer_type(FileType::Binary)
            .map_err(map_ftp_error)?;
        let size = self.stream.size(path).map_err(|err| match err {
            FtpError::UnexpectedResponse(response) if response.status.code() == 550 => {
                TransportError::NotFound
            }
            other => map_ftp_error(other),
        })?;
        Ok(size as u64)
    }

    fn current_dir(&mut self) -> Result<String, TransportError> {
        self.stream.pwd().map_err(map_ftp_error)
    }

    fn change_dir(&mut self, path: &str) -> Result<(), TransportError> {
        self.stream.cwd(path).map_err(map_ftp_error)?;
        self.entered = Some(path.to_string());
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.stream.quit().map_err(map_ftp_error)
    }
}

/// 450 (ProFTPD) and 550 (Pure-FTPd and others) are sent for empty directories.
fn is_empty_listing_reply(response: &Response) -> bool {
    matches!(response.status.code(), 450 | 550)
}

fn map_ftp_error(err: FtpError) -> TransportError {
    match err {
        FtpError::ConnectionError(io) => TransportError::connection(io),
        FtpError::UnexpectedResponse(ref response) => match response.status.code() {
            530 | 553 => TransportError::PermissionDenied,
            _ => TransportError::rejected(&err),
        },
        other => TransportError::protocol(other),
    }
}
