// Library interface for revline
// Backward line reading over seekable byte sources

pub mod error;
pub mod reader;

#[cfg(test)]
mod test_utils;

pub use error::{ReaderError, Result};
pub use reader::{ByteSource, Lines, ReverseLineCursor};
