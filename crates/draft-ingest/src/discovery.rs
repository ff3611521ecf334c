//! Table file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::table::TableFormat;

/// CSV and Parquet files directly inside `dir`, sorted by file name.
/// Subdirectories and other extensions are ignored.
pub fn list_table_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|entry| entry.path()).map_err(read_error))
        .collect::<Result<Vec<_>>>()?;
    files.retain(|path| path.is_file() && TableFormat::from_path(path).is_some());
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
