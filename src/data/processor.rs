//! Data Processor Module
//! Selects the x column and y columns of a graph as aligned value sequences.

use crate::charts::{ChartData, SeriesData, XValues};
use crate::data::Dataset;
use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Column '{column}' not found in {source_file} (available: {available})")]
    ColumnNotFound {
        column: String,
        source_file: PathBuf,
        available: String,
    },
    #[error("Column '{0}' is not numeric and cannot be plotted on the y axis")]
    NonNumericColumn(String),
    #[error("No data rows in {0}")]
    EmptyData(PathBuf),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Turns dataset columns into chart-ready values.
pub struct DataProcessor;

impl DataProcessor {
    /// Extract `x_column` and every `y_column` with rows kept aligned.
    ///
    /// Numeric x columns give numeric positions; anything else becomes a
    /// category label per row. Null cells are kept as `None`.
    pub fn select(
        dataset: &Dataset,
        x_column: &str,
        y_columns: &[String],
    ) -> Result<ChartData, ProcessorError> {
        for column in std::iter::once(x_column).chain(y_columns.iter().map(String::as_str)) {
            Self::require_column(dataset, column)?;
        }
        if dataset.row_count() == 0 {
            return Err(ProcessorError::EmptyData(dataset.source().to_path_buf()));
        }

        let df = dataset.dataframe();
        let x_series = df.column(x_column)?;
        let x = if Self::is_numeric(x_series.dtype()) {
            XValues::Numeric(Self::to_f64(x_series)?)
        } else {
            let labels = x_series.cast(&DataType::String)?;
            XValues::Categories(
                labels
                    .as_materialized_series()
                    .str()?
                    .into_iter()
                    .map(|v| v.unwrap_or_default().to_string())
                    .collect(),
            )
        };

        let mut series = Vec::with_capacity(y_columns.len());
        for y_column in y_columns {
            let y_series = df.column(y_column)?;
            if !Self::is_numeric(y_series.dtype()) {
                return Err(ProcessorError::NonNumericColumn(y_column.clone()));
            }
            series.push(SeriesData {
                name: y_column.clone(),
                values: Self::to_f64(y_series)?,
            });
        }

        Ok(ChartData { x, series })
    }

    fn require_column(dataset: &Dataset, column: &str) -> Result<(), ProcessorError> {
        if dataset.has_column(column) {
            Ok(())
        } else {
            Err(ProcessorError::ColumnNotFound {
                column: column.to_string(),
                source_file: dataset.source().to_path_buf(),
                available: dataset.columns().join(", "),
            })
        }
    }

    fn to_f64(column: &Column) -> Result<Vec<Option<f64>>, ProcessorError> {
        let values = column.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|v| v.is_finite()))
            .collect())
    }

    fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }
}
