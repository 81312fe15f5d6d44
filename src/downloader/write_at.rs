//! Positional write targets and the progress-reporting sink handed to the
//! transfer engine.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::ProgressState;

use super::traits::{Item, Progress};

/// Destination that accepts writes at arbitrary offsets
///
/// Takes `&self` so chunks from different threads of the same item can land
/// concurrently at non-overlapping offsets.
pub trait WriteAt: Send + Sync {
    /// Write `buf` at `offset`, returning how many bytes were written
    fn write_at(&self, buf: &[u8], offset: u64) -> std::io::Result<usize>;
}

#[cfg(unix)]
impl WriteAt for std::fs::File {
    fn write_at(&self, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        std::os::unix::fs::FileExt::write_at(self, buf, offset)
    }
}

#[cfg(windows)]
impl WriteAt for std::fs::File {
    fn write_at(&self, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        std::os::windows::fs::FileExt::seek_write(self, buf, offset)
    }
}

/// In-memory target; grows (zero-filled) to fit writes past the end
impl WriteAt for Mutex<Vec<u8>> {
    fn write_at(&self, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        let (start, end) = usize::try_from(offset)
            .ok()
            .and_then(|start| Some((start, start.checked_add(buf.len())?)))
            .ok_or_else(|| std::io::Error::other("offset does not fit in memory"))?;
        let mut data = self
            .lock()
            .map_err(|_| std::io::Error::other("memory target lock poisoned"))?;
        if data.len() < end {
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(buf);
        Ok(buf.len())
    }
}

/// Forwards writes to an item's target and reports byte progress
pub(crate) struct ProgressWriter<'a, I> {
    item: &'a I,
    progress: &'a dyn Progress<I>,
    downloaded: AtomicU64,
}

impl<'a, I: Item> ProgressWriter<'a, I> {
    pub(crate) fn new(item: &'a I, progress: &'a dyn Progress<I>) -> Self {
        Self {
            item,
            progress,
            downloaded: AtomicU64::new(0),
        }
    }
}

impl<I: Item> WriteAt for ProgressWriter<'_, I> {
    fn write_at(&self, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        let written = self.item.target().write_at(buf, offset)?;
        let written_bytes = written as u64;
        let downloaded = self.downloaded.fetch_add(written_bytes, Ordering::Relaxed) + written_bytes;
        self.progress.on_progress(
            self.item,
            ProgressState {
                downloaded,
                total: self.item.size(),
            },
        );
        Ok(written)
    }
}
