//! SFTP transport.
//!
//! SFTP has a real stat call, so containers are recognised from file
//! attributes instead of by trying to enter them. The protocol itself has no
//! working directory; one is kept here so the transport behaves like the FTP
//! one from the scanner's point of view.
//!
//! The SSH client is asynchronous. The transport owns a single-threaded tokio
//! runtime and blocks on each request, keeping the scanner synchronous.

use std::sync::Arc;

use ftpdu_core::{ConnectError, TransportError, path};
use russh::client;
use russh::keys::ssh_key;
use russh_sftp::client::SftpSession;
use russh_sftp::client::error::Error as SftpError;
use russh_sftp::protocol::{FileAttributes, StatusCode};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use crate::address::Scheme;
use crate::session::ConnectConfig;
use crate::transport::Transport;

/// SSH client callbacks.
struct ClientHandler {
    host: String,
}

impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // TODO: verify against ~/.ssh/known_hosts instead of trusting on first use.
        let fingerprint = server_public_key.fingerprint(ssh_key::HashAlg::Sha256);
        warn!(host = %self.host, %fingerprint, "accepting SSH host key without verification");
        Ok(true)
    }
}

/// Transport backed by an SFTP subsystem channel.
pub struct SftpTransport {
    runtime: Runtime,
    session: client::Handle<ClientHandler>,
    sftp: SftpSession,
    cwd: String,
}

impl SftpTransport {
    /// Connect, authenticate with a password and open the SFTP subsystem.
    pub fn connect(config: &ConnectConfig) -> Result<Self, ConnectError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConnectError::Protocol {
                message: format!("cannot start SSH runtime: {e}"),
            })?;

        let (session, sftp, cwd) = runtime.block_on(open_session(config))?;
        info!(address = %config.address, user = %config.username, %cwd, "SFTP session open");

        Ok(Self {
            runtime,
            session,
            sftp,
            cwd,
        })
    }

    fn stat(&self, path: &str) -> Result<FileAttributes, SftpError> {
        self.runtime.block_on(self.sftp.metadata(path))
    }
}

async fn open_session(
    config: &ConnectConfig,
) -> Result<(client::Handle<ClientHandler>, SftpSession, String), ConnectError> {
    let address = config.address.socket_addr();
    let handshake = |e: &dyn std::fmt::Display| ConnectError::Handshake {
        message: e.to_string(),
    };

    let handler = ClientHandler {
        host: config.address.host.clone(),
    };
    let ssh_config = Arc::new(client::Config::default());

    debug!(%address, "connecting to SSH server");
    let connecting = client::connect(ssh_config, address.as_str(), handler);
    let mut session = tokio::time::timeout(config.connect_timeout, connecting)
        .await
        .map_err(|_| ConnectError::Unreachable {
            address: address.clone(),
            message: "connection timed out".to_string(),
        })?
        .map_err(|e| match e {
            russh::Error::IO(io) => ConnectError::Unreachable {
                address: address.clone(),
                message: io.to_string(),
            },
            other => handshake(&other),
        })?;

    let auth = session
        .authenticate_password(config.username.clone(), config.password.clone())
        .await
        .map_err(|e| handshake(&e))?;
    if !auth.success() {
        return Err(ConnectError::AuthenticationFailed {
            user: config.username.clone(),
        });
    }

    let channel = session
        .channel_open_session()
        .await
        .map_err(|e| handshake(&e))?;
    channel
        .request_subsystem(true, "sftp")
        .await
        .map_err(|e| handshake(&e))?;
    let sftp = SftpSession::new(channel.into_stream())
        .await
        .map_err(|e| handshake(&e))?;

    let cwd = sftp
        .canonicalize(".")
        .await
        .map_err(|e| ConnectError::Protocol {
            message: e.to_string(),
        })?;

    Ok((session, sftp, cwd))
}

impl Transport for SftpTransport {
    fn scheme(&self) -> Scheme {
        Scheme::Sftp
    }

    fn list(&mut self, dir: &str) -> Result<Vec<String>, TransportError> {
        let dir = path::resolve(&self.cwd, dir);
        let entries = self
            .runtime
            .block_on(self.sftp.read_dir(dir.as_str()))
            .map_err(map_sftp_error)?;
        Ok(entries.map(|entry| entry.file_name()).collect())
    }

    fn probe_is_container(&mut self, target: &str) -> Result<bool, TransportError> {
        let target = path::resolve(&self.cwd, target);
        let is_dir = classify(&target, self.stat(&target))?;
        if is_dir {
            self.cwd = target;
        }
        Ok(is_dir)
    }

    fn file_size(&mut self, target: &str) -> Result<u64, TransportError> {
        let target = path::resolve(&self.cwd, target);
        let metadata = self.stat(&target).map_err(map_sftp_error)?;
        metadata
            .size
            .ok_or_else(|| TransportError::protocol("server reported no size"))
    }

    fn current_dir(&mut self) -> Result<String, TransportError> {
        Ok(self.cwd.clone())
    }

    fn change_dir(&mut self, dir: &str) -> Result<(), TransportError> {
        let dir = path::resolve(&self.cwd, dir);
        let metadata = self.stat(&dir).map_err(map_sftp_error)?;
        if !metadata.is_dir() {
            return Err(TransportError::rejected(format!("{dir} is not a directory")));
        }
        self.cwd = dir;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.runtime
            .block_on(self.sftp.close())
            .map_err(map_sftp_error)?;
        self.runtime
            .block_on(
                self.session
                    .disconnect(russh::Disconnect::ByApplication, "", "en"),
            )
            .map_err(TransportError::connection)
    }
}

/// Whether a stat result describes a container.
///
/// A status reply means the entry cannot be entered, the same way a refused
/// `CWD` does over FTP.
fn classify(target: &str, stat: Result<FileAttributes, SftpError>) -> Result<bool, TransportError> {
    match stat {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(SftpError::Status(status)) => {
            debug!(path = target, code = ?status.status_code, "stat failed, treating entry as a file");
            Ok(false)
        }
        Err(other) => Err(map_sftp_error(other)),
    }
}

fn map_sftp_error(err: SftpError) -> TransportError {
    match err {
        SftpError::Status(status) => match status.status_code {
            StatusCode::NoSuchFile => TransportError::NotFound,
            StatusCode::PermissionDenied => TransportError::PermissionDenied,
            StatusCode::NoConnection | StatusCode::ConnectionLost => {
                TransportError::connection(status.error_message)
            }
            _ => TransportError::rejected(status.error_message),
        },
        SftpError::IO(message) => TransportError::Connection { message },
        SftpError::Timeout => TransportError::connection("request timed out"),
        other => TransportError::protocol(other),
    }
}

#[cfg(test)]
mod tests {
    use russh_sftp::protocol::Status;

    use super::*;

    fn status(code: StatusCode) -> SftpError {
        SftpError::Status(Status {
            id: 7,
            status_code: code,
            error_message: format!("{code:?}"),
            language_tag: "en".to_string(),
        })
    }

    #[test]
    fn test_status_codes_map_to_transport_errors() {
        assert_eq!(map_sftp_error(status(StatusCode::NoSuchFile)), TransportError::NotFound);
        assert_eq!(
            map_sftp_error(status(StatusCode::PermissionDenied)),
            TransportError::PermissionDenied
        );
        assert!(map_sftp_error(status(StatusCode::ConnectionLost)).is_connection_lost());
        assert!(matches!(
            map_sftp_error(status(StatusCode::Failure)),
            TransportError::Rejected { .. }
        ));
    }

    #[test]
    fn test_session_failures_are_connection_losses() {
        assert!(map_sftp_error(SftpError::IO("broken pipe".to_string())).is_connection_lost());
        assert!(map_sftp_error(SftpError::Timeout).is_connection_lost());
        assert!(matches!(
            map_sftp_error(SftpError::UnexpectedPacket),
            TransportError::Protocol { .. }
        ));
    }

    #[test]
    fn test_directories_are_containers() {
        let mut dir = FileAttributes::default();
        dir.set_dir(true);
        assert_eq!(classify("/srv", Ok(dir)), Ok(true));

        let mut file = FileAttributes::default();
        file.set_regular(true);
        file.size = Some(10);
        assert_eq!(classify("/srv/a.txt", Ok(file)), Ok(false));
    }

    #[test]
    fn test_status_reply_on_stat_means_file() {
        assert_eq!(classify("/srv/x", Err(status(StatusCode::PermissionDenied))), Ok(false));
        assert_eq!(classify("/srv/x", Err(status(StatusCode::NoSuchFile))), Ok(false));
    }

    #[test]
    fn test_lost_session_during_stat_propagates() {
        let err = classify("/srv/x", Err(SftpError::IO("reset".to_string()))).unwrap_err();
        assert!(err.is_connection_lost());
    }
}
