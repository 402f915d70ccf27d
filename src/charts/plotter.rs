//! Chart Plotter Module
//! Draws line, marker, scatter and bar series onto a plotters chart.

use crate::config::ChartKind;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

/// Series colors, cycled in y column order
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Gray
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
];

const LINE_WIDTH: u32 = 2;
const MARKER_RADIUS: i32 = 4;
/// Share of a category slot covered by its bar group
const BAR_GROUP_WIDTH: f64 = 0.8;

pub type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// X axis values of a chart, one entry per data row
#[derive(Debug, Clone, PartialEq)]
pub enum XValues {
    Numeric(Vec<Option<f64>>),
    Categories(Vec<String>),
}

/// One y column
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Aligned x values and y series for one graph
#[derive(Debug, Clone)]
pub struct ChartData {
    pub x: XValues,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    pub fn row_count(&self) -> usize {
        match &self.x {
            XValues::Numeric(values) => values.len(),
            XValues::Categories(labels) => labels.len(),
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.x, XValues::Categories(_))
    }

    /// X coordinate of every row. Categories sit at their row index.
    pub fn positions(&self) -> Vec<Option<f64>> {
        match &self.x {
            XValues::Numeric(values) => values.clone(),
            XValues::Categories(labels) => (0..labels.len()).map(|i| Some(i as f64)).collect(),
        }
    }

    /// Tick label of every row, used when rows are drawn as categories.
    pub fn category_labels(&self) -> Vec<String> {
        match &self.x {
            XValues::Categories(labels) => labels.clone(),
            XValues::Numeric(values) => values
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default())
                .collect(),
        }
    }

    /// Min and max over the numeric x values.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        match &self.x {
            XValues::Numeric(values) => bounds(values.iter().flatten().copied()),
            XValues::Categories(_) => None,
        }
    }

    /// Min and max over every y series.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(
            self.series
                .iter()
                .flat_map(|s| s.values.iter().flatten().copied()),
        )
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Draws the series of a graph according to its kind.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> RGBColor {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw every y series of `data`. Series are labelled for the legend
    /// only when `labelled` is set.
    pub fn draw<DB: DrawingBackend>(
        chart: &mut Chart<'_, DB>,
        kind: ChartKind,
        data: &ChartData,
        labelled: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let series_count = data.series.len();
        for (index, series) in data.series.iter().enumerate() {
            let color = Self::series_color(index);
            match kind {
                ChartKind::Line => Self::draw_line(chart, data, series, color, false, labelled)?,
                ChartKind::Plot => Self::draw_line(chart, data, series, color, true, labelled)?,
                ChartKind::Scatter => Self::draw_scatter(chart, data, series, color, labelled)?,
                ChartKind::Bar => {
                    Self::draw_bars(chart, series, index, series_count, color, labelled)?
                }
            }
        }
        Ok(())
    }

    /// Connected points, broken wherever x or y is missing.
    fn draw_line<DB: DrawingBackend>(
        chart: &mut Chart<'_, DB>,
        data: &ChartData,
        series: &SeriesData,
        color: RGBColor,
        markers: bool,
        labelled: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let segments = Self::segments(&data.positions(), &series.values);
        let style = color.stroke_width(LINE_WIDTH);

        if markers {
            chart.draw_series(
                segments
                    .iter()
                    .flatten()
                    .map(|&point| Circle::new(point, MARKER_RADIUS, color.filled())),
            )?;
        }

        let anno = chart.draw_series(
            segments
                .into_iter()
                .map(move |points| PathElement::new(points, style)),
        )?;
        if labelled {
            anno.label(series.name.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], style)
            });
        }
        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        chart: &mut Chart<'_, DB>,
        data: &ChartData,
        series: &SeriesData,
        color: RGBColor,
        labelled: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let points = Self::points(&data.positions(), &series.values);
        let anno = chart.draw_series(
            points
                .into_iter()
                .map(|point| Circle::new(point, MARKER_RADIUS, color.filled())),
        )?;
        if labelled {
            anno.label(series.name.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_RADIUS, color.filled()));
        }
        Ok(())
    }

    /// One bar per row, placed side by side with the other series of the
    /// same row.
    fn draw_bars<DB: DrawingBackend>(
        chart: &mut Chart<'_, DB>,
        series: &SeriesData,
        index: usize,
        series_count: usize,
        color: RGBColor,
        labelled: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let width = BAR_GROUP_WIDTH / series_count.max(1) as f64;
        let offset = -BAR_GROUP_WIDTH / 2.0 + index as f64 * width;

        let anno = chart.draw_series(series.values.iter().enumerate().filter_map(|(row, v)| {
            let v = (*v)?;
            let left = row as f64 + offset;
            Some(Rectangle::new([(left, 0.0), (left + width, v)], color.filled()))
        }))?;
        if labelled {
            anno.label(series.name.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 16, y + 5)], color.filled())
            });
        }
        Ok(())
    }

    /// Points with both coordinates present.
    fn points(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<(f64, f64)> {
        xs.iter()
            .zip(ys)
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect()
    }

    /// Runs of consecutive rows with both coordinates present.
    fn segments(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (x, y) in xs.iter().zip(ys) {
            match (x, y) {
                (Some(x), Some(y)) => current.push((*x, *y)),
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}
