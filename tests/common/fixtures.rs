//! File-backed items and content generators

use std::fs::File;
use std::path::{Path, PathBuf};

use batch_dl::DcId;
use batch_dl::downloader::{Item, WriteAt};
use batch_dl::progress::ItemLabel;

/// Item downloaded into a file on disk
pub struct FileItem {
    pub name: String,
    pub size: u64,
    pub dc: DcId,
    pub takeout: bool,
    pub path: PathBuf,
    file: File,
}

impl FileItem {
    /// Create the destination file for `name` inside `dir`
    pub fn create(dir: &Path, name: &str, size: u64, dc: DcId) -> Self {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        Self {
            name: name.to_string(),
            size,
            dc,
            takeout: false,
            path,
            file,
        }
    }

    pub fn with_takeout(mut self) -> Self {
        self.takeout = true;
        self
    }
}

impl Item for FileItem {
    type Location = String;

    fn size(&self) -> u64 {
        self.size
    }

    fn location(&self) -> &String {
        &self.name
    }

    fn dc(&self) -> DcId {
        self.dc
    }

    fn as_takeout(&self) -> bool {
        self.takeout
    }

    fn target(&self) -> &dyn WriteAt {
        &self.file
    }
}

impl ItemLabel for FileItem {
    fn label(&self) -> String {
        self.name.clone()
    }
}

/// Deterministic pseudo-random content of `len` bytes
pub fn content(seed: u8, len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}
