//! Config module - graph config loading and validation

mod loader;
mod schema;

pub use loader::{Config, ConfigError};
pub use schema::{ChartKind, GraphSpec, ValidationError};
