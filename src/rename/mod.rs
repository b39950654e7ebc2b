use anyhow::{anyhow, Result};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;

use crate::media::MediaRecord;
use crate::parser::FilenameParser;

/// A planned rename for a single media file.
///
/// Building a plan is pure: it parses the stem and composes the target
/// path, but touches nothing on disk until [`RenamePlan::apply`].
#[derive(Debug, Clone, Serialize)]
pub struct RenamePlan {
    pub source: PathBuf,
    pub target: PathBuf,
    pub record: MediaRecord,
    /// Directories that must exist before the rename
    #[serde(skip)]
    dirs: Vec<PathBuf>,
}

impl RenamePlan {
    /// Plan the rename of `source`.
    ///
    /// The target lives in the source directory unless `out_dir` overrides
    /// it. TV episodes are nested under collection and season folders;
    /// movies get a collection folder only when `separate` is on. The file
    /// extension is carried over lowercased.
    pub fn build(
        parser: &FilenameParser,
        source: &Path,
        separate: bool,
        out_dir: Option<&Path>,
    ) -> Self {
        let file = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (stem, ext) = split_extension(&file);
        let record = parser.parse(stem);

        let mut target = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let mut dirs = Vec::new();

        if separate || !record.season.is_empty() {
            let collection = record.collection_dir();
            if !collection.is_empty() {
                target.push(collection);
                dirs.push(target.clone());
            }
        }
        if !record.season.is_empty() {
            let season = record.season_dir();
            if !season.is_empty() {
                target.push(season);
                dirs.push(target.clone());
            }
        }
        target.push(format!("{}{}", record.display_name(), ext.to_lowercase()));

        Self {
            source: source.to_path_buf(),
            target,
            record,
            dirs,
        }
    }

    /// Create the needed directories and move the file into place.
    pub async fn apply(&self) -> Result<()> {
        for dir in &self.dirs {
            async_fs::create_dir_all(dir)
                .await
                .map_err(|e| anyhow!("cannot create folder {:?}: {}", dir, e))?;
        }

        if let Err(e) = async_fs::rename(&self.source, &self.target).await {
            if e.kind() == io::ErrorKind::PermissionDenied {
                return Err(anyhow!(
                    "no permission to move/rename the file (retry with sudo?): {}",
                    e
                ));
            }
            return Err(anyhow!("cannot move/rename the file: {}", e));
        }

        Ok(())
    }
}

/// File owner resolved once at startup and passed down to every rename.
#[derive(Debug, Clone, Copy)]
pub struct Owner {
    #[cfg(unix)]
    uid: nix::unistd::Uid,
    #[cfg(unix)]
    gid: nix::unistd::Gid,
}

impl Owner {
    /// Look up a user by name. `None` when the user does not exist or the
    /// platform has no notion of file ownership.
    pub fn lookup(name: &str) -> Option<Self> {
        #[cfg(unix)]
        {
            match nix::unistd::User::from_name(name) {
                Ok(Some(user)) => Some(Self {
                    uid: user.uid,
                    gid: user.gid,
                }),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!("cannot look up user {}: {}", name, e);
                    None
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = name;
            None
        }
    }

    /// Hand the file over to this owner.
    pub fn chown(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use nix::errno::Errno;

            match nix::unistd::chown(path, Some(self.uid), Some(self.gid)) {
                Ok(()) => Ok(()),
                Err(Errno::EPERM) | Err(Errno::EACCES) => Err(anyhow!(
                    "no permission to change the file owner (retry with sudo?)"
                )),
                Err(e) => Err(anyhow!("cannot change the file owner: {}", e)),
            }
        }
        #[cfg(not(unix))]
        {
            let _ = path;
            Ok(())
        }
    }
}

/// Change the file mode; a no-op warning on platforms without Unix modes.
pub async fn change_mode(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let permissions = std::fs::Permissions::from_mode(mode);
        async_fs::set_permissions(path, permissions)
            .await
            .map_err(|e| anyhow!("cannot change the file mode: {}", e))
    }
    #[cfg(not(unix))]
    {
        let _ = (path, mode);
        tracing::warn!("the OS does not support changing the file mode");
        Ok(())
    }
}

/// Split a file name into stem and extension, keeping the leading dot in
/// the extension (last-dot rule, so `a.b.c.mkv` yields `.mkv`).
fn split_extension(file: &str) -> (&str, &str) {
    match file.rfind('.') {
        Some(idx) => (&file[..idx], &file[idx..]),
        None => (file, ""),
    }
}
