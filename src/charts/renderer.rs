//! Static Chart Renderer
//! Renders one graph entry to an image file with plotters.
//!
//! Layout:
//! 1. Title caption on top (omitted when empty)
//! 2. Cartesian chart with grid and axis descriptions
//! 3. Series legend in the upper right corner when enabled

use crate::charts::{ChartData, ChartPlotter};
use crate::config::{ChartKind, GraphSpec};
use crate::data::{DataProcessor, Dataset, ProcessorError};
use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 24;
const DESC_SIZE: u32 = 16;
const LABEL_SIZE: u32 = 12;
/// Share of the data range added on each side of an axis
const AXIS_MARGIN: f64 = 0.05;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Data(#[from] ProcessorError),
    #[error("Unsupported output format '{0}' (expected png, jpg, jpeg, bmp or svg)")]
    UnsupportedFormat(String),
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
    #[error("Chart was drawn but '{0}' was not written")]
    NotWritten(PathBuf),
}

/// Image format of the output file, from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Bitmap,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "bmp" => Ok(OutputFormat::Bitmap),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn drawing_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `spec` from `dataset` into `spec.output_file`, creating its
    /// directory when needed.
    pub fn render(dataset: &Dataset, spec: &GraphSpec) -> Result<(), RenderError> {
        let output = spec.output_file();
        let format = OutputFormat::from_path(output)?;
        let data = DataProcessor::select(dataset, &spec.x_column, &spec.y_columns)?;

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let size = spec.pixel_size();
        debug!(
            "Drawing {} chart '{}' at {}x{} px ({:?})",
            spec.kind, spec.title, size.0, size.1, format
        );
        match format {
            OutputFormat::Bitmap => {
                let root = BitMapBackend::new(output, size).into_drawing_area();
                Self::draw(&root, spec, &data)?;
            }
            OutputFormat::Svg => {
                let root = SVGBackend::new(output, size).into_drawing_area();
                Self::draw(&root, spec, &data)?;
            }
        }

        if !output.is_file() {
            return Err(RenderError::NotWritten(output.to_path_buf()));
        }
        info!("Saved {} chart to {}", spec.kind, output.display());
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &GraphSpec,
        data: &ChartData,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(drawing_error)?;

        let categorical = data.is_categorical() || spec.kind == ChartKind::Bar;
        let (x_range, y_range) = Self::axis_ranges(data, spec.kind, categorical);
        debug!("Axis ranges x={:?} y={:?}", x_range, y_range);

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(65);
        if !spec.title.is_empty() {
            builder.caption(&spec.title, (FONT, TITLE_SIZE));
        }
        let mut chart = builder
            .build_cartesian_2d(x_range, y_range)
            .map_err(drawing_error)?;

        let labels = data.category_labels();
        let category_formatter = |v: &f64| Self::category_label(&labels, *v);
        let y_label = spec.y_label();

        {
            let mut mesh = chart.configure_mesh();
            mesh.x_desc(spec.x_label())
                .y_desc(y_label.as_str())
                .axis_desc_style((FONT, DESC_SIZE))
                .label_style((FONT, LABEL_SIZE));
            if categorical {
                mesh.x_labels(labels.len().max(1))
                    .x_label_formatter(&category_formatter);
            }
            if !spec.grid {
                mesh.disable_mesh();
            }
            mesh.draw().map_err(drawing_error)?;
        }

        let legend = spec.show_legend();
        ChartPlotter::draw(&mut chart, spec.kind, data, legend).map_err(drawing_error)?;

        if legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font((FONT, LABEL_SIZE))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(drawing_error)?;
        }

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Tick label for an x position; only whole row indices get one.
    fn category_label(labels: &[String], value: f64) -> String {
        let index = value.round();
        if (value - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        labels.get(index as usize).cloned().unwrap_or_default()
    }

    fn axis_ranges(data: &ChartData, kind: ChartKind, categorical: bool) -> (Range<f64>, Range<f64>) {
        let x_range = if categorical {
            -0.5..data.row_count().max(1) as f64 - 0.5
        } else {
            Self::padded(data.x_bounds().unwrap_or((0.0, 1.0)))
        };

        let (mut y_min, mut y_max) = data.y_bounds().unwrap_or((0.0, 1.0));
        if kind == ChartKind::Bar {
            // Bars grow from zero
            y_min = y_min.min(0.0);
            y_max = y_max.max(0.0);
        }
        (x_range, Self::padded((y_min, y_max)))
    }

    fn padded((min, max): (f64, f64)) -> Range<f64> {
        if (max - min).abs() < f64::EPSILON {
            let pad = if min == 0.0 { 1.0 } else { min.abs() * AXIS_MARGIN };
            return (min - pad)..(max + pad);
        }
        let pad = (max - min) * AXIS_MARGIN;
        (min - pad)..(max + pad)
    }
}
