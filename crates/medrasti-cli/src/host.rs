//! File-system delivery host
//!
//! Downloads are written to the output directory. Embedded invoices live
//! in a private temporary directory that disappears with the handle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use medrasti_core::{DeliveryHost, ViewerHandle};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Delivers invoices as files
#[derive(Debug, Clone)]
pub struct FsHost {
    output_dir: PathBuf,
}

impl FsHost {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl DeliveryHost for FsHost {
    type Handle = TempFileHandle;
    type Error = io::Error;

    fn save_download(&self, file_name: &str, bytes: &[u8]) -> io::Result<String> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), "download written");
        Ok(path.display().to_string())
    }

    fn embed(&self, file_name: &str, bytes: Vec<u8>) -> io::Result<TempFileHandle> {
        let dir = tempfile::Builder::new().prefix("medrasti-").tempdir()?;
        let path = dir.path().join(file_name);
        fs::write(&path, bytes)?;
        Ok(TempFileHandle { dir, path })
    }
}

/// A temporary invoice file, removed when released or dropped
#[derive(Debug)]
pub struct TempFileHandle {
    dir: TempDir,
    path: PathBuf,
}

impl TempFileHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ViewerHandle for TempFileHandle {
    fn location(&self) -> String {
        format!("file://{}", self.path.display())
    }

    fn release(self) {
        let path = self.path.display().to_string();
        if let Err(e) = self.dir.close() {
            warn!(%path, error = %e, "failed to remove temporary invoice");
        }
    }
}
