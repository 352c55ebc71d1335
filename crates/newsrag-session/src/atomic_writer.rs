//! Atomic file writer to ensure a crash never leaves a half-written session file
//!
//! On unix the file is created owner-only (0600): it holds the bearer token.

use newsrag_core::Result;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Writes to a temporary sibling file and renames it over the target on commit
pub(crate) struct AtomicWriter {
    temp_path: PathBuf,
    final_path: PathBuf,
    file: Option<File>,
}

impl AtomicWriter {
    /// Create a new atomic writer for the given path
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let final_path = path.as_ref().to_path_buf();

        if let Some(parent) = final_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = Self::temp_path(&final_path);
        // A leftover temp file would keep its old mode
        let _ = fs::remove_file(&temp_path);
        let file = Self::open_options().open(&temp_path)?;

        Ok(Self {
            temp_path,
            final_path,
            file: Some(file),
        })
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(data)?;
        }
        Ok(())
    }

    /// Flush to disk and rename over the final path
    pub(crate) fn commit(mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }

        fs::rename(&self.temp_path, &self.final_path)?;
        Ok(())
    }

    fn open_options() -> OpenOptions {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(FILE_MODE);
        options
    }

    fn temp_path(final_path: &Path) -> PathBuf {
        let mut temp = final_path.as_os_str().to_owned();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        // After a successful commit the temp file is already gone
        let _ = fs::remove_file(&self.temp_path);
    }
}
