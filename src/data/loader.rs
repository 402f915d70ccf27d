//! CSV Data Loader Module
//! Loads the input CSV into a Polars DataFrame and exposes columns by name.

use log::info;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file '{0}' not found")]
    FileNotFound(PathBuf),
    #[error("Data file '{0}' is empty")]
    Empty(PathBuf),
    #[error("Failed to read data file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed CSV '{path}': {source}")]
    Ragged {
        path: PathBuf,
        source: ::csv::Error,
    },
    #[error("Failed to parse CSV '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: PolarsError,
    },
}

/// Tabular data read from a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    source: PathBuf,
}

impl Dataset {
    /// Load a CSV file using Polars.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.iter().all(u8::is_ascii_whitespace) {
            return Err(LoaderError::Empty(path.to_path_buf()));
        }
        Self::check_row_lengths(path, &contents)?;

        let parse_error = |source| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()
            .map_err(parse_error)?
            .collect()
            .map_err(parse_error)?;

        info!(
            "Loaded {} ({} rows, columns: {})",
            path.display(),
            df.height(),
            df.get_column_names()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            df,
            source: path.to_path_buf(),
        })
    }

    /// Every row must have as many fields as the header. Polars pads short
    /// rows with nulls, so they are rejected here first.
    fn check_row_lengths(path: &Path, contents: &[u8]) -> Result<(), LoaderError> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(contents);
        for record in reader.byte_records() {
            record.map_err(|source| LoaderError::Ragged {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Wrap an existing DataFrame.
    #[cfg(test)]
    pub fn from_dataframe(df: DataFrame, source: impl Into<PathBuf>) -> Self {
        Self {
            df,
            source: source.into(),
        }
    }

    /// Get list of column names in file order.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Path the data was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}
