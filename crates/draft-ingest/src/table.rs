//! CSV and Parquet table IO, chosen by file extension.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// On-disk table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Parquet => "parquet",
        }
    }

    /// Detects the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(TableFormat::Csv)
        } else if ext.eq_ignore_ascii_case("parquet") || ext.eq_ignore_ascii_case("pq") {
            Some(TableFormat::Parquet)
        } else {
            None
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(TableFormat::Csv),
            "parquet" | "pq" => Ok(TableFormat::Parquet),
            other => Err(format!("unknown table format: {other}")),
        }
    }
}

/// Path of table `stem` inside `dir` for the given format.
pub fn table_path(dir: &Path, stem: &str, format: TableFormat) -> PathBuf {
    dir.join(format!("{stem}.{}", format.extension()))
}

/// Finds an existing table `stem` in `dir`, preferring `preferred`.
pub fn resolve_table(dir: &Path, stem: &str, preferred: TableFormat) -> Option<PathBuf> {
    let other = match preferred {
        TableFormat::Csv => TableFormat::Parquet,
        TableFormat::Parquet => TableFormat::Csv,
    };
    [preferred, other]
        .into_iter()
        .map(|format| table_path(dir, stem, format))
        .find(|path| path.is_file())
}

/// Reads a CSV or Parquet table into a DataFrame.
///
/// A zero-byte CSV reads as an empty frame.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let format = TableFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    match format {
        TableFormat::Csv => {
            if metadata.len() == 0 {
                return Ok(DataFrame::empty());
            }
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(None)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))
                .and_then(|reader| reader.finish())
                .map_err(|e| IngestError::TableParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
        }
        TableFormat::Parquet => {
            let file = File::open(path).map_err(|e| IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            ParquetReader::new(file)
                .finish()
                .map_err(|e| IngestError::TableParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
        }
    }
}

/// Writes a DataFrame as CSV or Parquet, creating parent directories.
pub fn write_table(path: &Path, df: &mut DataFrame) -> Result<()> {
    let format = TableFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    match format {
        TableFormat::Csv => {
            CsvWriter::new(&mut file).include_header(true).finish(df)?;
        }
        TableFormat::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
    }
    Ok(())
}
