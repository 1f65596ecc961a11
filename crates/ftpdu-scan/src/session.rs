//! Session setup.

use std::time::Duration;

use derive_builder::Builder;
use ftpdu_core::ConnectError;

use crate::address::{RemoteAddress, Scheme};
use crate::ftp::FtpTransport;
use crate::transport::Transport;

/// Everything needed to open a session.
#[derive(Clone, Builder)]
#[builder(setter(into))]
pub struct ConnectConfig {
    /// Server to connect to; its scheme picks the transport.
    pub address: RemoteAddress,

    /// Login name.
    pub username: String,

    /// Login password.
    pub password: String,

    /// Limit on establishing the connection.
    #[builder(default = "Duration::from_secs(30)")]
    pub connect_timeout: Duration,
}

impl ConnectConfig {
    /// Create a new connect config builder.
    pub fn builder() -> ConnectConfigBuilder {
        ConnectConfigBuilder::default()
    }
}

impl std::fmt::Debug for ConnectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectConfig")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Open a session with the transport selected by the address scheme.
pub fn connect(config: &ConnectConfig) -> Result<Box<dyn Transport>, ConnectError> {
    match config.address.scheme {
        Scheme::Ftp => Ok(Box::new(FtpTransport::connect(config)?)),
        #[cfg(feature = "sftp")]
        Scheme::Sftp => Ok(Box::new(crate::sftp::SftpTransport::connect(config)?)),
        #[cfg(not(feature = "sftp"))]
        Scheme::Sftp => Err(ConnectError::Protocol {
            message: "built without SFTP support".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_timeout() {
        let config = ConnectConfig::builder()
            .address(RemoteAddress::new(Scheme::Ftp, "localhost"))
            .username("anonymous")
            .password("guest")
            .build()
            .unwrap();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_requires_credentials() {
        let result = ConnectConfig::builder()
            .address(RemoteAddress::new(Scheme::Sftp, "localhost"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let config = ConnectConfig::builder()
            .address(RemoteAddress::new(Scheme::Ftp, "localhost"))
            .username("alice")
            .password("hunter2")
            .build()
            .unwrap();
        let shown = format!("{config:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_unreachable_server_fails_before_scanning() {
        // Port 1 on the loopback interface is reserved and closed.
        let config = ConnectConfig::builder()
            .address(RemoteAddress {
                port: 1,
                ..RemoteAddress::new(Scheme::Ftp, "127.0.0.1")
            })
            .username("anonymous")
            .password("guest")
            .connect_timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        match connect(&config) {
            Err(ConnectError::Unreachable { address, .. }) => assert_eq!(address, "127.0.0.1:1"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connected to a closed port"),
        }
    }
}
