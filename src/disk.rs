use std::path::{Path, PathBuf};
use sysinfo::Disks;

const MIB: u64 = 1024 * 1024;

/// Reports free space for the filesystem that will hold scratch files.
pub trait SpaceProbe {
    /// Free space in whole MiB. 0 when it can't be determined.
    fn free_mb(&self) -> u64;
}

/// Free space from the mounted disk list.
#[derive(Debug, Clone)]
pub struct SystemSpaceProbe {
    path: PathBuf,
}

impl SystemSpaceProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpaceProbe for SystemSpaceProbe {
    fn free_mb(&self) -> u64 {
        let disks = Disks::new_with_refreshed_list();
        let mounts = disks
            .list()
            .iter()
            .map(|d| (d.mount_point().to_path_buf(), d.available_space()));

        match available_for(&self.path, mounts) {
            Some(bytes) => bytes / MIB,
            None => {
                tracing::warn!(path = %self.path.display(), "No mounted filesystem found for path");
                0
            }
        }
    }
}

/// Fixed answer, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedSpaceProbe(pub u64);

impl SpaceProbe for FixedSpaceProbe {
    fn free_mb(&self) -> u64 {
        self.0
    }
}

/// Available bytes on the mount with the longest mount point containing `path`.
pub(crate) fn available_for(
    path: &Path,
    mounts: impl IntoIterator<Item = (PathBuf, u64)>,
) -> Option<u64> {
    mounts
        .into_iter()
        .filter(|(mount, _)| path.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
        .map(|(_, available)| available)
}
