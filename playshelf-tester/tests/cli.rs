use std::process::Command;

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/games.json");

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "playshelf-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_playshelf-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("spotlight-wraparound"));
    assert!(content.contains("query-debounce"));
}

#[test]
fn cli_runs_all_scenarios_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_playshelf-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args(["--catalog", CATALOG])
        .args([
            "--scenarios",
            "all",
            "--report",
            "json",
            "--iterations",
            "2",
            "--seeds",
            "1,0x2a",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Playshelf Catalog Tester"));

    let report = std::fs::read_to_string(output_path).expect("read report");
    let parsed: serde_json::Value = serde_json::from_str(&report).expect("json report");
    let runs = parsed.as_array().expect("array");
    assert!(runs.len() >= 30);
    assert!(runs.iter().any(|run| run["seed"] == 42));
    assert!(runs.iter().all(|run| run["passed"] == true));
}

#[test]
fn cli_browses_with_filters() {
    let exe = env!("CARGO_BIN_EXE_playshelf-tester");
    let output_path = temp_path("browse");
    let output = Command::new(exe)
        .env("NO_COLOR", "1")
        .args(["--catalog", CATALOG, "--seed", "7", "--featured-only", "--sort", "az"])
        .arg("--output")
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("generation 1: 23 games"));
    assert!(content.contains("Categories: all"));
    assert!(content.contains("Neon Drift"));
    assert!(content.contains("Spotlight:"));
}

#[test]
fn cli_replays_script() {
    let exe = env!("CARGO_BIN_EXE_playshelf-tester");
    let script_path = temp_path("script.txt");
    std::fs::write(
        &script_path,
        "# find a racer\ntype ne\n+40 type neon\n+400 open 0\nembed\nclose\n+8000 tick\n",
    )
    .expect("write script");
    let output_path = temp_path("replay");
    let output = Command::new(exe)
        .env("NO_COLOR", "1")
        .args(["--catalog", CATALOG, "--seed", "3", "--script"])
        .arg(&script_path)
        .arg("--output")
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Player closed"));
    assert!(content.contains("Script: 6 steps, 1 queries applied"));
}

#[test]
fn cli_rejects_bad_script() {
    let exe = env!("CARGO_BIN_EXE_playshelf-tester");
    let script_path = temp_path("bad-script.txt");
    std::fs::write(&script_path, "open\n").expect("write script");
    let output = Command::new(exe)
        .args(["--catalog", CATALOG, "--seed", "3", "--script"])
        .arg(&script_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("needs an argument"));
}

#[test]
fn cli_reports_missing_catalog() {
    let exe = env!("CARGO_BIN_EXE_playshelf-tester");
    let output = Command::new(exe)
        .args(["--catalog", "/nonexistent/playshelf.json", "--seed", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Could not load games"));
}
