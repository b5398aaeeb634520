use super::source::ByteSource;
use crate::error::{ReaderError, Result};
use log::{debug, trace, warn};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Scan state guarded by the cursor's lock
struct ScanState<S> {
    /// Byte source, `None` once released
    source: Option<S>,

    /// Every byte at or after this offset has been returned already
    position: u64,
}

/// Reads a file's lines backward, last line first, by seeking through it byte by byte
///
/// The cursor can be shared between threads (`Arc<ReverseLineCursor>` or a scoped borrow).
/// Each call to [`read_previous_line`](Self::read_previous_line) scans one whole line under
/// a single lock acquisition, so concurrent callers each receive distinct lines and together
/// receive every line exactly once.
///
/// Bytes are decoded one per character (`0x00..=0xFF` map to `U+0000..=U+00FF`). Every CR
/// and LF byte is dropped from returned lines, including a bare CR in the middle of a line.
pub struct ReverseLineCursor<S: ByteSource = File> {
    /// Path the cursor was opened from, if any (used in error messages)
    path: Option<PathBuf>,

    state: Mutex<ScanState<S>>,

    closed: AtomicBool,
}

impl ReverseLineCursor<File> {
    /// Open a file and position the cursor at its end
    ///
    /// A missing file fails here with [`ReaderError::NotFound`], never on the first read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ReaderError::NotFound { path: path.clone() }
            } else {
                ReaderError::io(Some(&path), source)
            }
        })?;

        let len = file
            .byte_len()
            .map_err(|source| ReaderError::io(Some(&path), source))?;
        debug!("opened {} ({} bytes) for reverse reading", path.display(), len);

        Ok(Self::with_state(file, len, Some(path)))
    }
}

impl<S: ByteSource> ReverseLineCursor<S> {
    /// Wrap an already opened byte source, starting at its end
    pub fn from_source(mut source: S) -> Result<Self> {
        let len = source
            .byte_len()
            .map_err(|e| ReaderError::io(None, e))?;
        debug!("wrapped byte source ({} bytes) for reverse reading", len);

        Ok(Self::with_state(source, len, None))
    }

    fn with_state(source: S, position: u64, path: Option<PathBuf>) -> Self {
        Self {
            path,
            state: Mutex::new(ScanState {
                source: Some(source),
                position,
            }),
            closed: AtomicBool::new(false),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ScanState<S>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn io_error(&self, source: io::Error) -> ReaderError {
        ReaderError::io(self.path.as_ref(), source)
    }

    /// Return the line ending at the current position, or `None` at end of data
    ///
    /// `None` is also returned once the cursor is closed. A single trailing line terminator
    /// belongs to the last line; each extra terminator at the end of the file shows up as an
    /// empty line. I/O errors are returned as-is and the position keeps the bytes consumed
    /// before the failure.
    pub fn read_previous_line(&self) -> Result<Option<String>> {
        let mut state = self.lock_state();
        if self.closed.load(Ordering::Acquire) {
            return Ok(None);
        }

        let ScanState { source, position } = &mut *state;
        let Some(source) = source.as_mut() else {
            return Ok(None);
        };
        if *position == 0 {
            return Ok(None);
        }

        // Collected in scan order, i.e. right to left
        let mut line_bytes = Vec::new();
        loop {
            *position -= 1;
            let byte = source
                .read_byte_at(*position)
                .map_err(|e| self.io_error(e))?;
            if byte != b'\n' && byte != b'\r' {
                line_bytes.push(byte);
            }

            if *position == 0 {
                break;
            }
            let preceding = source
                .read_byte_at(*position - 1)
                .map_err(|e| self.io_error(e))?;
            if preceding == b'\n' {
                break;
            }
        }
        let remaining = *position;
        drop(state);

        line_bytes.reverse();
        let line: String = line_bytes.into_iter().map(char::from).collect();
        trace!("read previous line, {} bytes left", remaining);

        Ok(Some(line))
    }

    /// Iterate over the remaining lines, last first
    ///
    /// The iterator stops after the first error it yields.
    pub fn lines(&self) -> Lines<'_, S> {
        Lines {
            cursor: self,
            failed: false,
        }
    }

    /// Number of bytes not yet returned
    pub fn position(&self) -> u64 {
        self.lock_state().position
    }

    /// True once `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Release the byte source
    ///
    /// Only the first call releases anything and reports release errors; later calls
    /// return `Ok(())`. The cursor counts as closed even when the release fails. Reads
    /// that start after this returns yield `None`.
    pub fn close(&self) -> Result<()> {
        let source = {
            let mut state = self.lock_state();
            if self.closed.swap(true, Ordering::AcqRel) {
                return Ok(());
            }
            state.source.take()
        };

        let Some(source) = source else {
            return Ok(());
        };
        source.release().map_err(|e| {
            warn!("failed to release byte source: {}", e);
            self.io_error(e)
        })?;
        debug!("closed reverse line cursor");

        Ok(())
    }
}

impl<S: ByteSource> Drop for ReverseLineCursor<S> {
    fn drop(&mut self) {
        let state = match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(source) = state.source.take() {
            if let Err(e) = source.release() {
                warn!("failed to release byte source on drop: {}", e);
            }
        }
    }
}

/// Iterator over the lines of a [`ReverseLineCursor`], last line first
pub struct Lines<'a, S: ByteSource> {
    cursor: &'a ReverseLineCursor<S>,
    failed: bool,
}

impl<S: ByteSource> Iterator for Lines<'_, S> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.cursor.read_previous_line().transpose();
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }
}

impl<'a, S: ByteSource> IntoIterator for &'a ReverseLineCursor<S> {
    type Item = Result<String>;
    type IntoIter = Lines<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines()
    }
}
