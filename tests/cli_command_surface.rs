use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_immoflow"))
        .args(args)
        .env("IMMOFLOW_HOME", root)
        .env("HOME", root)
        .output()
        .expect("run immoflow")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn assert_err_contains(output: &Output, needle: &str) {
    assert!(
        !output.status.success(),
        "expected failure, stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
    let text = format!("{}{}", stdout(output), stderr(output));
    assert!(
        text.contains(needle),
        "expected error to contain `{needle}`, got:\n{text}"
    );
}

fn kv_lines(output: &Output) -> BTreeMap<String, String> {
    stdout(output)
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn lines_with_prefix(output: &Output, prefix: &str) -> Vec<String> {
    stdout(output)
        .lines()
        .filter_map(|line| line.strip_prefix(prefix).map(ToString::to_string))
        .collect()
}

fn ok(root: &Path, args: &[&str]) -> BTreeMap<String, String> {
    let output = run(root, args);
    assert_ok(&output);
    kv_lines(&output)
}

#[test]
fn help_lists_commands() {
    let temp = tempdir().expect("temp dir");
    let output = run(temp.path(), &[]);
    assert_ok(&output);
    let text = stdout(&output);
    for command in ["workflows", "show <kind>", "complete <kind> <step>", "catalog check"] {
        assert!(text.contains(command), "missing `{command}` in:\n{text}");
    }
}

#[test]
fn unknown_command_and_kind_fail() {
    let temp = tempdir().expect("temp dir");
    assert_err_contains(&run(temp.path(), &["launch"]), "unknown command `launch`");
    assert_err_contains(
        &run(temp.path(), &["show", "vermietung"]),
        "workflow kind must be one of",
    );
    assert_err_contains(
        &run(temp.path(), &["complete", "finanzierung", "ghost"]),
        "unknown step `ghost`",
    );
}

#[test]
fn financing_walkthrough_persists_between_invocations() {
    let temp = tempdir().expect("temp dir");
    let root = temp.path();

    let shown = ok(root, &["show", "finanzierung"]);
    assert_eq!(shown["progress"], "0");
    assert_eq!(shown["current"], "calculator");
    assert_eq!(shown["step.calculator"], "active");
    assert_eq!(shown["step.offers"], "blocked");

    let blocked = run(root, &["go", "finanzierung", "offers"]);
    assert_ok(&blocked);
    let values = kv_lines(&blocked);
    assert_eq!(values["outcome"], "blocked");
    assert_eq!(values["missing"], "calculator");
    assert!(lines_with_prefix(&blocked, "navigate=").is_empty());
    assert!(lines_with_prefix(&blocked, "notify=")[0].starts_with("warning|"));

    let refused = run(root, &["complete", "finanzierung", "tilgung"]);
    assert_ok(&refused);
    let values = kv_lines(&refused);
    assert_eq!(values["outcome"], "blocked");
    assert_eq!(values["missing"], "offers");
    assert_eq!(values["progress"], "0");
    assert!(lines_with_prefix(&refused, "notify=")[0].starts_with("warning|"));

    let completed = run(root, &["complete", "financing", "calculator"]);
    assert_ok(&completed);
    let values = kv_lines(&completed);
    assert_eq!(values["outcome"], "advanced");
    assert_eq!(values["next"], "offers");
    assert_eq!(values["progress"], "33");
    assert_eq!(
        lines_with_prefix(&completed, "navigate="),
        vec!["/finanzierung/angebote"]
    );

    assert_eq!(ok(root, &["complete", "finanzierung", "offers"])["progress"], "67");
    let done = run(root, &["complete", "finanzierung", "tilgung"]);
    assert_ok(&done);
    assert_eq!(kv_lines(&done)["outcome"], "workflow_complete");
    assert_eq!(kv_lines(&done)["progress"], "100");
    let notes = lines_with_prefix(&done, "notify=");
    assert_eq!(notes.len(), 2);
    assert!(notes[1].starts_with("success|Workflow abgeschlossen|"));

    let listed = ok(root, &["workflows"]);
    assert_eq!(listed["finanzierung.progress"], "100");
    assert_eq!(listed["analyse.progress"], "0");
    assert_eq!(listed["steuer-optimierung.current"], "property-data");

    let reset = ok(root, &["reset", "finanzierung"]);
    assert_eq!(reset["progress"], "0");
    assert_eq!(reset["current"], "calculator");
    assert_eq!(ok(root, &["progress", "finanzierung"])["progress"], "0");

    assert!(root.join("state").is_dir());
    let log = fs::read_to_string(root.join("logs/workflow.log")).expect("event log");
    assert!(log.contains("\"event\":\"step.blocked\""));
    assert!(log.contains("\"event\":\"workflow.completed\""));
    assert!(log.contains("\"event\":\"workflow.reset\""));
}

#[test]
fn show_json_emits_summary() {
    let temp = tempdir().expect("temp dir");
    let root = temp.path();
    ok(root, &["complete", "analyse", "market-data"]);
    let output = run(root, &["show", "analyse", "--json"]);
    assert_ok(&output);
    let summary: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("summary json");
    assert_eq!(summary["workflow"], "analyse");
    assert_eq!(summary["progress"], 25);
    assert_eq!(summary["currentStepId"], "rental-yield");
    assert_eq!(summary["steps"].as_array().expect("steps").len(), 4);
}

#[test]
fn next_and_progress_flags() {
    let temp = tempdir().expect("temp dir");
    let root = temp.path();

    let next = ok(root, &["next", "steuer-optimierung", "--limit", "2"]);
    assert_eq!(next["count"], "2");
    assert_eq!(next["next.1"], "steuer-optimierung/depreciation");
    assert_eq!(next["next.2"], "steuer-optimierung/expenses");

    let last = ok(root, &["next", "finanzierung", "tilgung"]);
    assert_eq!(last["count"], "0");

    assert_err_contains(
        &run(root, &["next", "finanzierung", "--limit", "many"]),
        "invalid --limit value `many`",
    );

    fs::write(
        root.join("config.yaml"),
        "controller:\n  cross_workflow_suggestions: true\n  partial_credit_for_active_step: true\n",
    )
    .expect("write settings");
    let suggestions = ok(root, &["next", "finanzierung", "tilgung"]);
    assert_eq!(suggestions["count"], "3");
    assert_eq!(suggestions["next.1"], "steuer-optimierung/property-data");

    let partial = ok(root, &["progress", "finanzierung", "--active", "calculator"]);
    assert_eq!(partial["progress"], "17");
}

#[test]
fn data_commands_round_trip_json() {
    let temp = tempdir().expect("temp dir");
    let root = temp.path();

    let missing = ok(root, &["data", "get", "finanzierung", "loan"]);
    assert_eq!(missing["found"], "false");

    ok(
        root,
        &["data", "set", "finanzierung", "loan", r#"{"amount":250000}"#],
    );
    let found = ok(root, &["data", "get", "finanzierung", "loan"]);
    assert_eq!(found["found"], "true");
    assert_eq!(found["value"], r#"{"amount":250000}"#);

    assert_err_contains(
        &run(root, &["data", "set", "finanzierung", "loan", "{oops"]),
        "invalid json value",
    );
}

#[test]
fn inspect_reports_corrupt_state() {
    let temp = tempdir().expect("temp dir");
    let root = temp.path();
    assert_eq!(ok(root, &["inspect", "finanzierung"])["status"], "missing");

    ok(root, &["complete", "finanzierung", "calculator"]);
    let healthy = ok(root, &["inspect", "finanzierung"]);
    assert_eq!(healthy["status"], "ok");
    assert_eq!(healthy["completed"], "calculator");
    assert_eq!(healthy["current"], "offers");

    fs::write(
        root.join("state/immoflow-workflow-finanzierung.json"),
        "not json",
    )
    .expect("corrupt state");
    let corrupt = ok(root, &["inspect", "finanzierung"]);
    assert_eq!(corrupt["status"], "corrupt");

    let shown = ok(root, &["show", "finanzierung"]);
    assert_eq!(shown["progress"], "0");
    assert_eq!(shown["step.calculator"], "active");
}

#[test]
fn sqlite_backend_is_selected_from_settings() {
    let temp = tempdir().expect("temp dir");
    let root = temp.path();
    fs::write(root.join("config.yaml"), "storage:\n  backend: sqlite\nlocale: en\n")
        .expect("write settings");

    let done = run(root, &["complete", "finanzierung", "calculator"]);
    assert_ok(&done);
    assert!(lines_with_prefix(&done, "notify=")[0].starts_with("success|Step completed|"));
    assert_eq!(ok(root, &["progress", "finanzierung"])["progress"], "33");
    assert!(root.join("workflow_state.sqlite3").is_file());
    assert!(!root.join("state").exists());
}

#[test]
fn catalog_check_and_show() {
    let temp = tempdir().expect("temp dir");
    let root = temp.path();

    let builtin = ok(root, &["catalog", "check"]);
    assert_eq!(builtin["catalog"], "ok");
    assert_eq!(builtin["source"], "builtin");
    assert_eq!(builtin["workflows"], "4");

    let shown = run(root, &["catalog", "show"]);
    assert_ok(&shown);
    let catalog_path = root.join("catalog.yaml");
    fs::write(&catalog_path, stdout(&shown)).expect("write catalog");
    let checked = ok(
        root,
        &["catalog", "check", catalog_path.to_str().expect("utf8 path")],
    );
    assert_eq!(checked["catalog"], "ok");

    let cyclic = root.join("cyclic.yaml");
    fs::write(
        &cyclic,
        r#"
workflows:
  - id: finanzierung
    title: { de: Finanzierung }
    steps:
      - { id: offers, path: /a, label: { de: A }, required_steps: [tilgung] }
      - { id: tilgung, path: /b, label: { de: B }, required_steps: [offers] }
"#,
    )
    .expect("write cyclic catalog");
    assert_err_contains(
        &run(root, &["catalog", "check", cyclic.to_str().expect("utf8 path")]),
        "prerequisite cycle through steps: offers, tilgung",
    );
}

#[test]
fn configured_catalog_limits_available_workflows() {
    let temp = tempdir().expect("temp dir");
    let root = temp.path();
    let catalog_path = root.join("catalog.yaml");
    fs::write(
        &catalog_path,
        r#"
workflows:
  - id: analyse
    title: { de: Analyse }
    steps:
      - { id: only, path: /analyse, label: { de: Einziger Schritt } }
"#,
    )
    .expect("write catalog");
    fs::write(
        root.join("config.yaml"),
        format!("catalog_path: {}\n", catalog_path.display()),
    )
    .expect("write settings");

    let listed = ok(root, &["workflows"]);
    assert_eq!(listed["analyse.current"], "only");
    assert!(!listed.contains_key("finanzierung.progress"));
    assert_err_contains(
        &run(root, &["show", "finanzierung"]),
        "workflow `finanzierung` is not defined in the catalog",
    );
}
