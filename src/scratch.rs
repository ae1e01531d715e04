use crate::CleanerResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Scoped scratch file used by overwrite passes.
///
/// Acquiring reserves a path under the scratch directory; dropping the guard
/// removes whatever the pass commands left there. The file is gone after the
/// pass no matter how the commands exited, or whether an interrupt arrived.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn acquire(dir: &Path, name: &str) -> CleanerResult<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(name);

        // Leftover from a run that was killed hard
        remove_if_present(&path)?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = remove_if_present(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove scratch file"
            );
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
