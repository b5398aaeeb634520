use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// Seekable byte storage a [`ReverseLineCursor`](super::ReverseLineCursor) scans backward.
///
/// Only single-byte random reads are needed; any buffering is up to the implementor.
pub trait ByteSource: Send {
    /// Total length of the source in bytes
    fn byte_len(&mut self) -> io::Result<u64>;

    /// Seek to `offset` and read the byte stored there
    ///
    /// Offsets at or past the end fail with `UnexpectedEof`.
    fn read_byte_at(&mut self, offset: u64) -> io::Result<u8>;

    /// Release the underlying handle
    fn release(self) -> io::Result<()>
    where
        Self: Sized,
    {
        drop(self);
        Ok(())
    }
}

fn read_one<R: Read + Seek>(reader: &mut R, offset: u64) -> io::Result<u8> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte)?;
    Ok(byte[0])
}

impl ByteSource for File {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn read_byte_at(&mut self, offset: u64) -> io::Result<u8> {
        read_one(self, offset)
    }
}

/// In-memory sources, e.g. `Cursor<Vec<u8>>` or `Cursor<&'static [u8]>`
impl<T: AsRef<[u8]> + Send> ByteSource for Cursor<T> {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().as_ref().len() as u64)
    }

    fn read_byte_at(&mut self, offset: u64) -> io::Result<u8> {
        read_one(self, offset)
    }
}
