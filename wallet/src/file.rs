//! Persistence of credential files.
//!
//! Keytabs and srvtabs are never written in place. The new contents go to
//! `<file>.new`, the current file (if any) is hard-linked to `<file>.bak`, and
//! only then is `<file>.new` renamed over `<file>`. A reader of `<file>` sees
//! either the old or the new contents, never a partial write.

use crate::{Result, WalletError};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Write},
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
};
use tracing::debug;

const FILE_MODE: u32 = 0o600;
const NEW_SUFFIX: &str = ".new";
const BACKUP_SUFFIX: &str = ".bak";
const STDIN_NAME: &str = "-";

/// Replaces the contents of `path`, creating it if needed.
pub fn overwrite_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(FILE_MODE)
        .open(path)
        .map_err(WalletError::file("cannot create", path))?;
    file.write_all(data)
        .map_err(WalletError::file("cannot write to", path))?;
    file.sync_all()
        .map_err(WalletError::file("cannot flush", path))?;
    Ok(())
}

/// Appends `data` to `path`, creating it if needed.
pub fn append_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .mode(FILE_MODE)
        .open(path)
        .map_err(WalletError::file("cannot open", path))?;
    file.write_all(data)
        .map_err(WalletError::file("cannot write to", path))?;
    file.sync_all()
        .map_err(WalletError::file("cannot flush", path))?;
    Ok(())
}

/// Atomically replaces `path` with `data`, keeping the previous contents in
/// `path.bak`.
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    StagedFile::stage(path, data)?.commit()
}

/// Reads a whole file into memory. The name `-` reads standard input.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut data = vec![];
    if path == Path::new(STDIN_NAME) {
        io::stdin()
            .lock()
            .read_to_end(&mut data)
            .map_err(WalletError::file("cannot read", path))?;
    } else {
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut data))
            .map_err(WalletError::file("cannot read", path))?;
    }
    Ok(data)
}

/// New contents fully written to `<file>.new` but not yet visible under
/// `<file>`.
///
/// Dropping a staged file without calling [`StagedFile::commit`] leaves the
/// canonical file untouched and the `.new` file behind, exactly what a crash
/// between the two steps would leave.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    staged: PathBuf,
}

impl StagedFile {
    pub fn stage(path: &Path, data: &[u8]) -> Result<Self> {
        let staged = sibling(path, NEW_SUFFIX);
        overwrite_file(&staged, data)?;
        Ok(Self {
            path: path.to_owned(),
            staged,
        })
    }

    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    pub fn commit(self) -> Result<()> {
        let exists = self
            .path
            .try_exists()
            .map_err(WalletError::file("cannot stat", &self.path))?;
        if exists {
            let backup = sibling(&self.path, BACKUP_SUFFIX);
            match fs::remove_file(&backup) {
                Ok(()) => (),
                Err(e) if e.kind() == io::ErrorKind::NotFound => (),
                Err(e) => return Err(WalletError::file("cannot remove old backup", &backup)(e)),
            }
            // Filesystems without hard links still get a backup, just not a
            // free one.
            if fs::hard_link(&self.path, &backup).is_err() {
                fs::copy(&self.path, &backup)
                    .map_err(WalletError::file("cannot back up to", &backup))?;
            }
        }
        fs::rename(&self.staged, &self.path)
            .map_err(WalletError::file("cannot rename into place", &self.path))?;
        sync_parent(&self.path)?;
        debug!(path = %self.path.display(), backup = exists, "committed file");
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

// The rename is only durable once the directory entry is.
fn sync_parent(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(parent)
        .and_then(|dir| dir.sync_all())
        .map_err(WalletError::file("cannot sync directory", parent))
}
