//! Batch Runner Module
//! Renders every configured graph in order and collects a per-graph outcome.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::config::{GraphSpec, ValidationError};
use crate::data::{Dataset, LoaderError};
use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Datasets read when no input file is given
pub const DEFAULT_INPUTS: [&str; 2] = ["data/examples.csv", "data/fibonacci.csv"];

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("invalid graph entry: {0}")]
    Invalid(#[from] ValidationError),
    #[error("Column '{column}' not found in any input ({inputs})")]
    ColumnNotFound { column: String, inputs: String },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Data the graphs are drawn from
#[derive(Debug)]
pub enum Inputs {
    /// Every graph uses this dataset
    Single(Dataset),
    /// Each graph uses the first dataset holding its x column
    Routed(Vec<Dataset>),
}

impl Inputs {
    /// Load `input`, or every default dataset when no input is given.
    pub fn load(input: Option<&Path>) -> Result<Self, LoaderError> {
        match input {
            Some(path) => Ok(Inputs::Single(Dataset::load(path)?)),
            None => {
                let datasets = DEFAULT_INPUTS
                    .iter()
                    .map(Dataset::load)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Inputs::Routed(datasets))
            }
        }
    }

    /// Dataset a graph is drawn from.
    pub fn dataset_for(&self, spec: &GraphSpec) -> Result<&Dataset, SpecError> {
        match self {
            Inputs::Single(dataset) => Ok(dataset),
            Inputs::Routed(datasets) => datasets
                .iter()
                .find(|d| d.has_column(&spec.x_column))
                .ok_or_else(|| SpecError::ColumnNotFound {
                    column: spec.x_column.clone(),
                    inputs: datasets
                        .iter()
                        .map(|d| d.source().display().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                }),
        }
    }
}

/// Result of one graph entry
#[derive(Debug)]
pub struct SpecOutcome {
    /// Position in the config, starting at 1
    pub index: usize,
    pub title: String,
    pub output_file: Option<PathBuf>,
    pub result: Result<(), SpecError>,
}

impl SpecOutcome {
    pub fn name(&self) -> String {
        if self.title.is_empty() {
            format!("graph #{}", self.index)
        } else {
            format!("graph #{} '{}'", self.index, self.title)
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<SpecOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &SpecOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn report(&self) {
        info!(
            "Rendered {} of {} graphs ({} failed)",
            self.succeeded(),
            self.outcomes.len(),
            self.failed()
        );
        for outcome in self.failures() {
            if let Err(err) = &outcome.result {
                match &outcome.output_file {
                    Some(path) => warn!("  {} ({}): {}", outcome.name(), path.display(), err),
                    None => warn!("  {}: {}", outcome.name(), err),
                }
            }
        }
    }
}

/// Render every graph in order. A failing graph is reported and skipped;
/// the rest still run.
pub fn run(inputs: &Inputs, graphs: Vec<Result<GraphSpec, ValidationError>>) -> RunSummary {
    let mut summary = RunSummary::default();

    for (i, entry) in graphs.into_iter().enumerate() {
        let outcome = match entry {
            Ok(spec) => SpecOutcome {
                index: i + 1,
                result: render_one(inputs, &spec),
                title: spec.title,
                output_file: Some(spec.output_file),
            },
            Err(err) => SpecOutcome {
                index: i + 1,
                title: String::new(),
                output_file: None,
                result: Err(err.into()),
            },
        };

        if let Err(err) = &outcome.result {
            warn!("Skipping {}: {}", outcome.name(), err);
        }
        summary.outcomes.push(outcome);
    }

    summary.report();
    summary
}

fn render_one(inputs: &Inputs, spec: &GraphSpec) -> Result<(), SpecError> {
    let dataset = inputs.dataset_for(spec)?;
    StaticChartRenderer::render(dataset, spec)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;

    fn write_csv(dir: &Path, name: &str, contents: &str) -> Dataset {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        Dataset::load(&path).unwrap()
    }

    fn graphs(dir: &Path, entries: &[(&str, &str, &str)]) -> Vec<Result<GraphSpec, ValidationError>> {
        let mut yaml = String::from("graphs:\n");
        for (x, ys, file) in entries {
            yaml.push_str(&format!(
                "  - {{title: {file}, x_column: {x}, y_columns: [{ys}], kind: line, output_file: '{}'}}\n",
                dir.join(file).display()
            ));
        }
        Config::from_yaml(&yaml).unwrap().graphs
    }

    #[test]
    fn bad_column_does_not_stop_later_graphs() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = Inputs::Single(write_csv(
            dir.path(),
            "data.csv",
            "x,a,b\n1,2,3\n2,4,6\n3,8,9\n",
        ));
        let graphs = graphs(
            dir.path(),
            &[
                ("x", "a", "first.png"),
                ("x", "missing", "second.png"),
                ("x", "a, b", "third.png"),
            ],
        );

        let summary = run(&inputs, graphs);

        assert_eq!(summary.outcomes.len(), 3);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_success());
        assert!(dir.path().join("first.png").is_file());
        assert!(!dir.path().join("second.png").exists());
        assert!(dir.path().join("third.png").is_file());

        let failed: Vec<usize> = summary.failures().map(|o| o.index).collect();
        assert_eq!(failed, vec![2]);
        assert!(matches!(
            summary.outcomes[1].result,
            Err(SpecError::Render(RenderError::Data(_)))
        ));
    }

    #[test]
    fn invalid_entries_are_reported_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = Inputs::Single(write_csv(dir.path(), "data.csv", "x,a\n1,2\n2,3\n"));
        let mut entries = graphs(dir.path(), &[("x", "a", "ok.png")]);
        entries.insert(0, Err(ValidationError::MissingField("kind")));

        let summary = run(&inputs, entries);

        assert_eq!(summary.succeeded(), 1);
        let first = &summary.outcomes[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.name(), "graph #1");
        assert!(matches!(
            first.result,
            Err(SpecError::Invalid(ValidationError::MissingField("kind")))
        ));
        assert_eq!(summary.outcomes[1].name(), "graph #2 'ok.png'");
    }

    #[test]
    fn routed_inputs_pick_dataset_by_x_column() {
        let dir = tempfile::tempdir().unwrap();
        let sales = write_csv(dir.path(), "sales.csv", "Date,Sales\n2023-01-01,1\n2023-01-02,2\n");
        let fib = write_csv(dir.path(), "fib.csv", "n,value\n1,1\n2,1\n3,2\n");
        let inputs = Inputs::Routed(vec![sales, fib]);

        let graphs = graphs(
            dir.path(),
            &[
                ("n", "value", "fib.png"),
                ("Date", "Sales", "sales.png"),
                ("Month", "Sales", "none.png"),
            ],
        );
        let spec = graphs[0].as_ref().unwrap();
        assert!(inputs.dataset_for(spec).unwrap().source().ends_with("fib.csv"));

        let summary = run(&inputs, graphs);
        assert_eq!(summary.succeeded(), 2);
        match &summary.outcomes[2].result {
            Err(SpecError::ColumnNotFound { column, inputs }) => {
                assert_eq!(column, "Month");
                assert!(inputs.contains("sales.csv") && inputs.contains("fib.csv"));
            }
            other => panic!("expected ColumnNotFound, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_is_a_success() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = Inputs::Single(write_csv(dir.path(), "data.csv", "x,a\n1,2\n"));
        let summary = run(&inputs, Vec::new());
        assert!(summary.is_success());
        assert_eq!(summary.succeeded(), 0);
    }

    #[test]
    fn missing_input_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Inputs::load(Some(dir.path().join("absent.csv").as_path())).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }
}
