use crate::reader::ByteSource;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory byte source that fails every read at one offset.
pub struct FailingSource {
    bytes: Vec<u8>,
    fail_at: u64,
}

impl FailingSource {
    pub fn new(bytes: &[u8], fail_at: u64) -> Self {
        Self {
            bytes: bytes.to_vec(),
            fail_at,
        }
    }
}

impl ByteSource for FailingSource {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.bytes.len() as u64)
    }

    fn read_byte_at(&mut self, offset: u64) -> io::Result<u8> {
        if offset == self.fail_at {
            return Err(io::Error::other("injected read failure"));
        }
        self.bytes
            .get(offset as usize)
            .copied()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

/// In-memory byte source whose release always fails, counting release attempts.
pub struct ReleaseFailSource {
    bytes: Vec<u8>,
    releases: Arc<AtomicUsize>,
}

impl ReleaseFailSource {
    pub fn new(bytes: &[u8]) -> (Self, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        let source = Self {
            bytes: bytes.to_vec(),
            releases: Arc::clone(&releases),
        };
        (source, releases)
    }
}

impl ByteSource for ReleaseFailSource {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.bytes.len() as u64)
    }

    fn read_byte_at(&mut self, offset: u64) -> io::Result<u8> {
        self.bytes
            .get(offset as usize)
            .copied()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }

    fn release(self) -> io::Result<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::other("injected release failure"))
    }
}
