//! Row access and frame construction helpers.
//!
//! [`FrameView`] reads loosely typed source columns by case-insensitive name;
//! [`FrameBuilder`] assembles typed output columns in order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, Column, DataFrame, NamedFrom, Series};

use crate::error::{IngestError, Result};
use crate::polars_utils::{any_to_f64, any_to_i64, any_to_string_non_empty, parse_flag};

/// Read-only view over a source frame with case-insensitive column lookup.
pub struct FrameView<'a> {
    df: &'a DataFrame,
    path: PathBuf,
    columns: BTreeMap<String, String>,
}

impl<'a> FrameView<'a> {
    pub fn new(df: &'a DataFrame, path: &Path) -> Self {
        let columns = df
            .get_column_names()
            .into_iter()
            .map(|name| {
                let name = name.as_str();
                (normalize_column(name), name.to_string())
            })
            .collect();
        Self {
            df,
            path: path.to_path_buf(),
            columns,
        }
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(&normalize_column(name))
    }

    /// First of `candidates` present in the frame.
    pub fn first_present<'c>(&self, candidates: &[&'c str]) -> Option<&'c str> {
        candidates
            .iter()
            .copied()
            .find(|name| self.has_column(name))
    }

    /// Fails with the list of absent columns.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| (*name).to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IngestError::MissingColumns {
                path: self.path.clone(),
                columns: missing,
            })
        }
    }

    fn value(&self, row: usize, name: &str) -> AnyValue<'_> {
        self.columns
            .get(&normalize_column(name))
            .and_then(|actual| self.df.column(actual).ok())
            .and_then(|column| column.get(row).ok())
            .unwrap_or(AnyValue::Null)
    }

    /// Trimmed text, or None when blank or absent.
    pub fn text(&self, row: usize, name: &str) -> Option<String> {
        any_to_string_non_empty(self.value(row, name))
    }

    /// Trimmed text, empty when blank or absent.
    pub fn text_or_empty(&self, row: usize, name: &str) -> String {
        self.text(row, name).unwrap_or_default()
    }

    pub fn number(&self, row: usize, name: &str) -> Option<f64> {
        any_to_f64(self.value(row, name))
    }

    pub fn integer(&self, row: usize, name: &str) -> Option<i64> {
        any_to_i64(self.value(row, name))
    }

    pub fn flag(&self, row: usize, name: &str) -> bool {
        match self.value(row, name) {
            AnyValue::Boolean(value) => value,
            AnyValue::Null => false,
            other => any_to_string_non_empty(other).is_some_and(|text| parse_flag(&text)),
        }
    }

    /// Decodes a required stored value, failing with the column and row.
    pub fn decode<T>(
        &self,
        row: usize,
        name: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T> {
        let raw = self.text_or_empty(row, name);
        parse(&raw).ok_or_else(|| IngestError::InvalidValue {
            field: format!("{name} (row {})", row + 1),
            value: raw,
            path: self.path.clone(),
        })
    }
}

fn normalize_column(name: &str) -> String {
    name.trim()
        .trim_matches('\u{feff}')
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

/// Column-by-column frame assembly.
#[derive(Default)]
pub struct FrameBuilder {
    columns: Vec<Column>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn opt_text<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let values: Vec<Option<String>> = values.into_iter().collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn number<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values: Vec<Option<f64>> = values.into_iter().collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn integer<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<i64>>,
    {
        let values: Vec<Option<i64>> = values.into_iter().collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn flag<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let values: Vec<bool> = values.into_iter().collect();
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    pub fn build(self) -> Result<DataFrame> {
        Ok(DataFrame::new(self.columns)?)
    }
}
