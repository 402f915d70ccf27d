use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const EXAMPLES_CSV: &str = "Date,Sales,Profit,Revenue\n\
    2023-01-01,100,20,120\n\
    2023-01-02,150,30,180\n\
    2023-01-03,130,25,155\n\
    2023-01-04,170,35,205\n\
    2023-01-05,160,32,192\n";

// Run the binary inside `dir` so relative paths resolve there
fn run_generator(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_graph_generator"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute graph_generator binary")
}

fn workspace_with_data() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("examples.csv"), EXAMPLES_CSV).unwrap();
    dir
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_help_lists_options() {
    let dir = TempDir::new().unwrap();
    let output = run_generator(dir.path(), &["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--input"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("config.yaml"));
}

#[test]
fn test_missing_config_is_fatal() {
    let dir = workspace_with_data();
    let output = run_generator(dir.path(), &["-i", "examples.csv", "-c", "absent.yaml"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("absent.yaml"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_default_config_path_is_used() {
    let dir = workspace_with_data();
    let output = run_generator(dir.path(), &["--input", "examples.csv"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("config.yaml"));
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yaml"),
        "graphs:\n  - {x_column: Date, y_columns: [Sales], kind: line, output_file: output/a.png}\n",
    )
    .unwrap();

    let output = run_generator(dir.path(), &["-i", "nope.csv"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("nope.csv"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_all_graphs_rendered() {
    let dir = workspace_with_data();
    fs::write(
        dir.path().join("config.yaml"),
        r#"graphs:
  - title: "Sales Over Time"
    x_column: Date
    y_columns: [Sales]
    kind: line
    output_file: output/sales.png
  - title: "Profit and Revenue"
    x_column: Date
    y_columns: [Profit, Revenue]
    kind: bar
    output_file: output/bars/profit_revenue.png
"#,
    )
    .unwrap();

    let output = run_generator(dir.path(), &["--input", "examples.csv"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    for file in ["output/sales.png", "output/bars/profit_revenue.png"] {
        let path = dir.path().join(file);
        assert!(fs::metadata(&path).unwrap().len() > 0, "{file} is empty");
    }
    assert!(stderr(&output).contains("Rendered 2 of 2 graphs"));
}

#[test]
fn test_partial_failure_keeps_going() {
    let dir = workspace_with_data();
    fs::write(
        dir.path().join("graphs.yaml"),
        r#"graphs:
  - title: "Missing column"
    x_column: Date
    y_columns: [Cost]
    kind: line
    output_file: output/cost.png
  - title: "No kind"
    x_column: Date
    y_columns: [Sales]
    output_file: output/no_kind.png
  - title: "Revenue"
    x_column: Date
    y_columns: [Revenue]
    kind: scatter
    output_file: output/revenue.png
"#,
    )
    .unwrap();

    let output = run_generator(dir.path(), &["-i", "examples.csv", "-c", "graphs.yaml"]);
    assert_eq!(output.status.code(), Some(1));

    assert!(dir.path().join("output/revenue.png").is_file());
    assert!(!dir.path().join("output/cost.png").exists());
    assert!(!dir.path().join("output/no_kind.png").exists());

    let log = stderr(&output);
    assert!(log.contains("Cost"));
    assert!(log.contains("kind"));
    assert!(log.contains("Rendered 1 of 3 graphs"));
}

#[test]
fn test_bundled_config_with_default_inputs() {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    for name in ["examples.csv", "fibonacci.csv"] {
        fs::copy(manifest.join("data").join(name), dir.path().join("data").join(name)).unwrap();
    }
    fs::copy(manifest.join("config.yaml"), dir.path().join("config.yaml")).unwrap();

    let output = run_generator(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let rendered = fs::read_dir(dir.path().join("output")).unwrap().count();
    assert_eq!(rendered, 5);
    assert!(dir.path().join("output/fibonacci.svg").is_file());
}

#[test]
fn test_mistyped_entry_fails_alone() {
    let dir = workspace_with_data();
    fs::write(
        dir.path().join("config.yaml"),
        "graphs:\n\
         \x20 - {x_column: Date, y_columns: Sales, kind: line, output_file: output/scalar.png}\n\
         \x20 - {x_column: Date, y_columns: [Sales], kind: line, output_file: output/sales.png}\n",
    )
    .unwrap();

    let output = run_generator(dir.path(), &["-i", "examples.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(dir.path().join("output/sales.png").is_file());
    assert!(!dir.path().join("output/scalar.png").exists());
    assert!(stderr(&output).contains("Rendered 1 of 2 graphs"));
}

#[test]
fn test_ragged_csv_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("short.csv"), "Date,Sales\n2023-01-01,100\n2023-01-02\n").unwrap();
    fs::write(
        dir.path().join("config.yaml"),
        "graphs:\n  - {x_column: Date, y_columns: [Sales], kind: line, output_file: output/a.png}\n",
    )
    .unwrap();

    let output = run_generator(dir.path(), &["-i", "short.csv"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("short.csv"));
    assert!(!dir.path().join("output").exists());
}
