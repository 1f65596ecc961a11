//! Server address parsing.

use std::fmt;
use std::str::FromStr;

use ftpdu_core::UsageError;

/// Transport protocol selected by the address prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain FTP.
    Ftp,
    /// SFTP over SSH.
    Sftp,
}

impl Scheme {
    /// Port used when the address names none.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Ftp => 21,
            Scheme::Sftp => 22,
        }
    }

    /// URL prefix for this scheme.
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Ftp => "ftp://",
            Scheme::Sftp => "sftp://",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Ftp => write!(f, "FTP"),
            Scheme::Sftp => write!(f, "SFTP"),
        }
    }
}

/// A parsed server address.
///
/// Accepted forms are `sftp://host[:port][/path]`, `ftp://host[:port][/path]`
/// and a bare `host[:port][/path]`, which selects FTP. IPv6 literals must be
/// bracketed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Remote directory named after the host, if any.
    pub path: Option<String>,
}

impl RemoteAddress {
    /// Create an address with the scheme's default port.
    pub fn new(scheme: Scheme, host: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            port: scheme.default_port(),
            path: None,
        }
    }

    /// `host:port` suitable for socket connection.
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.scheme.prefix(), self.socket_addr())?;
        if let Some(path) = &self.path {
            write!(f, "{path}")?;
        }
        Ok(())
    }
}

impl FromStr for RemoteAddress {
    type Err = UsageError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let invalid = |reason: &str| UsageError::invalid_address(input, reason);

        let (scheme, rest) = if let Some(rest) = strip_prefix_ignore_case(trimmed, "sftp://") {
            (Scheme::Sftp, rest)
        } else if let Some(rest) = strip_prefix_ignore_case(trimmed, "ftp://") {
            (Scheme::Ftp, rest)
        } else if trimmed.contains("://") {
            return Err(invalid("unsupported scheme, expected ftp:// or sftp://"));
        } else {
            (Scheme::Ftp, trimmed)
        };

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], Some(&rest[idx..])),
            None => (rest, None),
        };

        let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
            let end = bracketed
                .find(']')
                .ok_or_else(|| invalid("unterminated IPv6 literal"))?;
            let host = &bracketed[..end];
            let port = match &bracketed[end + 1..] {
                "" => None,
                tail => Some(
                    tail.strip_prefix(':')
                        .ok_or_else(|| invalid("unexpected text after IPv6 literal"))?,
                ),
            };
            (host, port)
        } else {
            match authority.rsplit_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (authority, None),
            }
        };

        if host.is_empty() {
            return Err(invalid("missing host name"));
        }

        let port = match port {
            Some(p) => p
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| invalid("port must be a number between 1 and 65535"))?,
            None => scheme.default_port(),
        };

        let path = path
            .filter(|p| *p != "/")
            .map(|p| p.trim_end_matches('/').to_string());

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
            path,
        })
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &input[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_is_ftp() {
        let addr: RemoteAddress = "ftp.example.org".parse().unwrap();
        assert_eq!(addr.scheme, Scheme::Ftp);
        assert_eq!(addr.host, "ftp.example.org");
        assert_eq!(addr.port, 21);
        assert_eq!(addr.path, None);
    }

    #[test]
    fn test_sftp_prefix() {
        let addr: RemoteAddress = "sftp://files.example.org:2222/var/www/".parse().unwrap();
        assert_eq!(addr.scheme, Scheme::Sftp);
        assert_eq!(addr.host, "files.example.org");
        assert_eq!(addr.port, 2222);
        assert_eq!(addr.path.as_deref(), Some("/var/www"));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let addr: RemoteAddress = "SFTP://host".parse().unwrap();
        assert_eq!(addr.scheme, Scheme::Sftp);
        assert_eq!(addr.port, 22);
    }

    #[test]
    fn test_ipv6_literal() {
        let addr: RemoteAddress = "ftp://[::1]:2121".parse().unwrap();
        assert_eq!(addr.host, "::1");
        assert_eq!(addr.port, 2121);
        assert_eq!(addr.socket_addr(), "[::1]:2121");
    }

    #[test]
    fn test_invalid_addresses() {
        assert!("".parse::<RemoteAddress>().is_err());
        assert!("http://host".parse::<RemoteAddress>().is_err());
        assert!("ftp://host:notaport".parse::<RemoteAddress>().is_err());
        assert!("ftp://host:0".parse::<RemoteAddress>().is_err());
        assert!("sftp://[::1".parse::<RemoteAddress>().is_err());
        assert!("ftp:///pub".parse::<RemoteAddress>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let addr: RemoteAddress = "sftp://host/srv".parse().unwrap();
        assert_eq!(addr.to_string(), "sftp://host:22/srv");
    }
}
