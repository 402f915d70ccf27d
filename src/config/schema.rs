//! Graph Configuration Schema
//! Raw config entries as written in the file, and their validated form.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Figure size used when an entry sets none, in inches
pub const DEFAULT_FIGURE_SIZE: FigureSize = FigureSize {
    width: 6.4,
    height: 4.8,
};
pub const DEFAULT_DPI: f64 = 100.0;

const MIN_PIXELS: f64 = 16.0;
const MAX_PIXELS: f64 = 16384.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("malformed entry: {0}")]
    InvalidEntry(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("'y_columns' must list at least one column")]
    EmptyYColumns,
    #[error("unsupported graph kind '{0}' (expected line, plot, scatter or bar)")]
    UnknownKind(String),
    #[error("'figure_size' must be two positive numbers, got {0:?}")]
    InvalidFigureSize(Vec<f64>),
    #[error("'dpi' must be positive, got {0}")]
    InvalidDpi(f64),
    #[error("image size {width}x{height} px is outside {min}..={max} px")]
    ImageSize {
        width: f64,
        height: f64,
        min: f64,
        max: f64,
    },
}

/// Chart rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Connected points
    Line,
    /// Connected points with markers
    Plot,
    /// Unconnected points
    Scatter,
    /// Grouped bars
    Bar,
}

impl FromStr for ChartKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(ChartKind::Line),
            "plot" => Ok(ChartKind::Plot),
            "scatter" => Ok(ChartKind::Scatter),
            "bar" => Ok(ChartKind::Bar),
            _ => Err(ValidationError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Line => "line",
            ChartKind::Plot => "plot",
            ChartKind::Scatter => "scatter",
            ChartKind::Bar => "bar",
        };
        f.write_str(name)
    }
}

/// Figure width and height in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

/// One graph entry exactly as written in the config file.
///
/// Every field is optional here so that a bad entry can be reported on its
/// own instead of failing the whole file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGraphSpec {
    pub title: Option<String>,
    pub x_column: Option<String>,
    pub y_columns: Option<Vec<String>>,
    pub kind: Option<String>,
    pub output_file: Option<PathBuf>,
    pub figure_size: Option<Vec<f64>>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub dpi: Option<f64>,
    pub grid: Option<bool>,
    pub legend: Option<bool>,
}

/// Top-level layout of a config file. Entries stay untyped values until
/// each one is converted on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig<V> {
    pub graphs: Vec<V>,
}

/// A validated graph entry
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSpec {
    pub title: String,
    pub x_column: String,
    pub y_columns: Vec<String>,
    pub kind: ChartKind,
    pub output_file: PathBuf,
    pub figure_size: Option<FigureSize>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub dpi: Option<f64>,
    pub grid: bool,
    pub legend: Option<bool>,
}

impl RawGraphSpec {
    pub fn validate(self) -> Result<GraphSpec, ValidationError> {
        let x_column = self
            .x_column
            .ok_or(ValidationError::MissingField("x_column"))?;
        let y_columns = self
            .y_columns
            .ok_or(ValidationError::MissingField("y_columns"))?;
        if y_columns.is_empty() {
            return Err(ValidationError::EmptyYColumns);
        }
        let kind: ChartKind = self
            .kind
            .ok_or(ValidationError::MissingField("kind"))?
            .parse()?;
        let output_file = self
            .output_file
            .ok_or(ValidationError::MissingField("output_file"))?;

        let figure_size = match self.figure_size.as_deref() {
            None => None,
            Some(&[width, height]) if width > 0.0 && height > 0.0 => {
                Some(FigureSize { width, height })
            }
            Some(other) => return Err(ValidationError::InvalidFigureSize(other.to_vec())),
        };
        if let Some(dpi) = self.dpi {
            if !(dpi > 0.0 && dpi.is_finite()) {
                return Err(ValidationError::InvalidDpi(dpi));
            }
        }

        let spec = GraphSpec {
            title: self.title.unwrap_or_default(),
            x_column,
            y_columns,
            kind,
            output_file,
            figure_size,
            x_label: self.x_label,
            y_label: self.y_label,
            dpi: self.dpi,
            grid: self.grid.unwrap_or(true),
            legend: self.legend,
        };

        let (width, height) = spec.pixel_extent();
        let in_range = |v: f64| (MIN_PIXELS..=MAX_PIXELS).contains(&v);
        if !(in_range(width) && in_range(height)) {
            return Err(ValidationError::ImageSize {
                width,
                height,
                min: MIN_PIXELS,
                max: MAX_PIXELS,
            });
        }

        Ok(spec)
    }
}

impl GraphSpec {
    /// X axis label, defaulting to the x column name.
    pub fn x_label(&self) -> &str {
        self.x_label.as_deref().unwrap_or(&self.x_column)
    }

    /// Y axis label, defaulting to the y column names.
    pub fn y_label(&self) -> String {
        self.y_label
            .clone()
            .unwrap_or_else(|| self.y_columns.join(", "))
    }

    pub fn figure_size(&self) -> FigureSize {
        self.figure_size.unwrap_or(DEFAULT_FIGURE_SIZE)
    }

    pub fn dpi(&self) -> f64 {
        self.dpi.unwrap_or(DEFAULT_DPI)
    }

    /// Output image size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (width, height) = self.pixel_extent();
        (width as u32, height as u32)
    }

    fn pixel_extent(&self) -> (f64, f64) {
        let size = self.figure_size();
        let dpi = self.dpi();
        ((size.width * dpi).round(), (size.height * dpi).round())
    }

    /// Legend is drawn when asked for, or by default for multi-series graphs.
    pub fn show_legend(&self) -> bool {
        self.legend.unwrap_or(self.y_columns.len() > 1)
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }
}
