use crate::error::{Error, Result};
use std::{io::Write, path::Path};
use tempfile::NamedTempFile;

/// Replace the content of a file, without ever leaving a partially written file behind.
///
/// The data is written to a temporary file in the target directory, which is then renamed to
/// the target. If anything fails, the temporary file gets removed when dropped.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = NamedTempFile::new_in(parent).map_err(Error::io("create file in", parent))?;
    staging
        .write_all(data)
        .map_err(Error::io("write", staging.path()))?;
    staging
        .as_file()
        .sync_all()
        .map_err(Error::io("sync", staging.path()))?;

    staging
        .persist(path)
        .map_err(|err| Error::io("write", path)(err.error))?;

    Ok(())
}
