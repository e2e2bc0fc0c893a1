//! Best-effort PID file bookkeeping

use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// PID file removed again when dropped
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Record the current process id. Failure is logged and yields `None`.
    pub fn write(path: &Path) -> Option<Self> {
        let result = fs::File::create(path).and_then(|mut file| {
            writeln!(file, "{}", std::process::id())?;
            file.sync_all()
        });

        match result {
            Ok(()) => {
                debug!("PID file written: {}", path.display());
                Some(Self {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                warn!("Could not write PID file {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to remove PID file {}: {}", self.path.display(), e);
        }
    }
}
