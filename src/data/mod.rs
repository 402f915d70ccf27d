//! Data module - CSV loading and column selection

mod loader;
mod processor;

pub use loader::{Dataset, LoaderError};
pub use processor::{DataProcessor, ProcessorError};
