//! The capability a remote filesystem must provide to be scanned.

use ftpdu_core::TransportError;

use crate::address::Scheme;

/// Minimal remote filesystem access used by the scanner.
///
/// All paths handed to a transport are absolute remote paths. Transports keep
/// a per-connection working directory; the scanner saves it with
/// [`current_dir`](Transport::current_dir) and puts it back with
/// [`change_dir`](Transport::change_dir) around every descent, so an
/// implementation is free to move it while probing.
pub trait Transport {
    /// Which protocol backs this transport.
    fn scheme(&self) -> Scheme;

    /// Names of the immediate children of `path`, in server order.
    ///
    /// Names may come back path-qualified depending on the server.
    fn list(&mut self, path: &str) -> Result<Vec<String>, TransportError>;

    /// Whether `path` is a container.
    ///
    /// A `true` answer may leave the working directory at `path`.
    fn probe_is_container(&mut self, path: &str) -> Result<bool, TransportError>;

    /// Size of the file at `path` in bytes.
    fn file_size(&mut self, path: &str) -> Result<u64, TransportError>;

    /// The connection's current working directory.
    fn current_dir(&mut self) -> Result<String, TransportError>;

    /// Change the connection's working directory.
    fn change_dir(&mut self, path: &str) -> Result<(), TransportError>;

    /// End the session.
    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn scheme(&self) -> Scheme {
        (**self).scheme()
    }

    fn list(&mut self, path: &str) -> Result<Vec<String>, TransportError> {
        (**self).list(path)
    }

    fn probe_is_container(&mut self, path: &str) -> Result<bool, TransportError> {
        (**self).probe_is_container(path)
    }

    fn file_size(&mut self, path: &str) -> Result<u64, TransportError> {
        (**self).file_size(path)
    }

    fn current_dir(&mut self) -> Result<String, TransportError> {
        (**self).current_dir()
    }

    fn change_dir(&mut self, path: &str) -> Result<(), TransportError> {
        (**self).change_dir(path)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}
