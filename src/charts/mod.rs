//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartPlotter, SeriesData, XValues};
pub use renderer::{RenderError, StaticChartRenderer};
