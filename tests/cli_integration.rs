use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

fn write_session(root: &Path, project: &str, session: &str, lines: &[&str]) {
    let path = root
        .join(project)
        .join("sessions")
        .join(session)
        .join("events.jsonl");
    write_file(&path, &lines.join("\n"));
}

fn submit(ts: &str, prompt: &str) -> String {
    format!(r#"{{"event":"prompt:submit","ts":"{ts}","data":{{"prompt":"{prompt}"}}}}"#)
}

fn complete(ts: &str) -> String {
    format!(r#"{{"event":"prompt:complete","ts":"{ts}"}}"#)
}

/// Two root sessions overlapping once, a delegated sub-session, and an
/// excluded project, all on 2026-01-10 (UTC).
fn fixture(root: &Path) {
    let a = [
        submit("2026-01-10T09:00:00+00:00", "explain the parser"),
        "{broken json".to_string(),
        complete("2026-01-10T09:02:00+00:00"),
        submit("2026-01-10T09:10:00+00:00", "now refactor it"),
        r#"{"event":"tool:call","ts":"2026-01-10T09:20:00+00:00"}"#.to_string(),
        complete("2026-01-10T09:40:00+00:00"),
    ];
    let b = [
        submit("2026-01-10T09:01:00+00:00", "fix the failing test"),
        complete("2026-01-10T09:05:00+00:00"),
        submit("2026-01-10T09:50:00+00:00", "still running?"),
    ];
    let sub = [
        submit("2026-01-10T09:00:30+00:00", "delegated work"),
        complete("2026-01-10T09:00:40+00:00"),
    ];
    let excluded = [
        submit("2026-01-10T11:00:00+00:00", "ignore me"),
        complete("2026-01-10T11:30:00+00:00"),
    ];
    let outside = [
        submit("2026-01-11T09:00:00+00:00", "tomorrow"),
        complete("2026-01-11T09:01:00+00:00"),
    ];

    write_session(root, "-home-dev-webapp", "session-a", &refs(&a));
    write_session(root, "-home-dev-webapp", "session-b", &refs(&b));
    write_session(root, "-home-dev-webapp", "session-a-1234_explorer", &refs(&sub));
    write_session(root, "-home-dev-Scratch", "session-c", &refs(&excluded));
    write_session(root, "-home-dev-webapp", "session-d", &refs(&outside));
}

fn refs(lines: &[String]) -> Vec<&str> {
    lines.iter().map(String::as_str).collect()
}

fn run_autostats(args: &[&str], home: &Path) -> (Option<i32>, Vec<u8>, Vec<u8>) {
    let bin = std::env::var("CARGO_BIN_EXE_autostats").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("autostats.exe");
        } else {
            path.push("autostats");
        }
        path.to_string_lossy().into_owned()
    });
    let output = Command::new(bin)
        .args(args)
        // Isolate from any real config file, key, or log directory
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("AMPLIFIER_HOME")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("run autostats");
    (output.status.code(), output.stdout, output.stderr)
}

fn json_run(projects: &Path, home: &Path, scope: &str, extra: &[&str]) -> Value {
    let projects = projects.to_string_lossy().into_owned();
    let mut args = vec!["--json", "-z", "UTC", "-t", scope, "-p", projects.as_str()];
    args.extend_from_slice(extra);
    let (code, stdout, stderr) = run_autostats(&args, home);
    assert_eq!(code, Some(0), "stderr: {}", String::from_utf8_lossy(&stderr));
    serde_json::from_slice(&stdout).expect("json")
}

#[test]
fn json_report_for_single_day() {
    let tmp = tempfile::tempdir().unwrap();
    let projects = tmp.path().join("projects");
    fixture(&projects);

    let json = json_run(&projects, tmp.path(), "2026/01/10", &["-x", "scratch"]);

    assert_eq!(json["time_scope"]["timezone"], "UTC");
    assert_eq!(json["sessions_scanned"], 3);
    assert_eq!(json["total_prompts_sent"], 4);

    let autonomy = &json["autonomy"];
    assert_eq!(autonomy["completed_periods"], 3);
    assert_eq!(autonomy["total_prompts_sent"], 4);
    assert_eq!(autonomy["total_seconds"], 2160.0);
    assert_eq!(autonomy["mean_seconds"], 720.0);
    assert_eq!(autonomy["median_seconds"], 240.0);
    assert_eq!(autonomy["max_seconds"], 1800.0);
    assert_eq!(autonomy["under_1min"], 0);
    assert_eq!(autonomy["between_1_5min"], 2);
    assert_eq!(autonomy["between_5_15min"], 0);
    assert_eq!(autonomy["over_15min"], 1);
    assert_eq!(autonomy["unique_sessions"], 2);

    assert_eq!(json["overlap"]["overlap_count"], 1);
    assert_eq!(json["overlap"]["max_parallel_sessions"], 2);
    assert!(json.get("semantic").is_none());
}

#[test]
fn exclusion_and_sub_sessions_change_the_population() {
    let tmp = tempfile::tempdir().unwrap();
    let projects = tmp.path().join("projects");
    fixture(&projects);

    let all = json_run(&projects, tmp.path(), "2026/01/10", &["--include-sub-sessions"]);
    assert_eq!(all["sessions_scanned"], 5);
    // a, b, the sub-session and the scratch project
    assert_eq!(all["autonomy"]["completed_periods"], 5);
    assert_eq!(all["autonomy"]["unique_sessions"], 4);
    // The sub-session and b both start while a is working
    assert_eq!(all["overlap"]["overlap_count"], 2);
    assert_eq!(all["overlap"]["max_parallel_sessions"], 2);
}

#[test]
fn empty_projects_dir_is_a_valid_run() {
    let tmp = tempfile::tempdir().unwrap();
    let projects = tmp.path().join("nothing-here");

    let json = json_run(&projects, tmp.path(), "2026/01/10", &[]);
    assert_eq!(json["sessions_scanned"], 0);
    assert!(json["autonomy"].is_null());
    assert_eq!(json["overlap"]["overlap_count"], 0);
    assert_eq!(json["overlap"]["max_parallel_sessions"], 0);
}

#[test]
fn invalid_scope_fails_before_reading() {
    let tmp = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_autostats(&["-t", "last tuesday", "-z", "UTC"], tmp.path());
    assert_eq!(code, Some(1));
    assert!(stdout.is_empty());
    assert!(String::from_utf8_lossy(&stderr).contains("Invalid time scope"));
}

#[test]
fn invalid_timezone_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_autostats(&["-t", "2026/01/10", "-z", "Mars/Olympus"], tmp.path());
    assert_eq!(code, Some(1));
    assert!(String::from_utf8_lossy(&stderr).contains("Mars/Olympus"));
}

#[test]
fn semantic_without_api_key_is_a_setup_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let projects = tmp.path().join("projects");
    fixture(&projects);
    let projects = projects.to_string_lossy().into_owned();

    let (code, stdout, stderr) = run_autostats(
        &[
            "--json",
            "-z",
            "UTC",
            "-t",
            "2026/01/10",
            "-p",
            &projects,
            "-F",
            "semantic_categories",
        ],
        tmp.path(),
    );
    assert_eq!(code, Some(1));
    assert!(stdout.is_empty());
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("Classifier setup failed"), "stderr: {stderr}");
    assert!(stderr.contains("ANTHROPIC_API_KEY"));
}

#[test]
fn semantic_with_no_prompts_skips_setup() {
    let tmp = tempfile::tempdir().unwrap();
    let projects = tmp.path().join("projects");
    fixture(&projects);

    let json = json_run(
        &projects,
        tmp.path(),
        "2026/03/01",
        &["-F", "semantic_categories"],
    );
    assert!(json["semantic"].is_null());
    assert!(json.as_object().unwrap().contains_key("semantic"));
}

#[test]
fn config_file_supplies_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let projects = tmp.path().join("projects");
    fixture(&projects);
    write_file(
        &tmp.path().join(".autostats.toml"),
        &format!(
            "sessions_path = {:?}\nexclude_projects = [\"scratch\"]\ntimezone = \"UTC\"\n",
            projects.to_string_lossy()
        ),
    );

    let (code, stdout, stderr) = run_autostats(&["--json", "-t", "2026/01/10"], tmp.path());
    assert_eq!(code, Some(0), "stderr: {}", String::from_utf8_lossy(&stderr));
    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["time_scope"]["timezone"], "UTC");
    assert_eq!(json["autonomy"]["completed_periods"], 3);
}

#[test]
fn table_output_summarizes_run() {
    let tmp = tempfile::tempdir().unwrap();
    let projects = tmp.path().join("projects");
    fixture(&projects);
    let projects = projects.to_string_lossy().into_owned();

    let (code, stdout, stderr) = run_autostats(
        &["--no-color", "-z", "UTC", "-t", "2026/01/10", "-p", &projects, "-x", "scratch"],
        tmp.path(),
    );
    assert_eq!(code, Some(0), "stderr: {}", String::from_utf8_lossy(&stderr));
    let stdout = String::from_utf8_lossy(&stdout);
    assert!(stdout.contains("Autonomy Summary"));
    assert!(stdout.contains("2026/01/10 00:00 - 2026/01/10 23:59 (UTC)"));
    assert!(stdout.contains("Max parallel sessions"));
    assert!(stdout.contains("3 sessions scanned"));
    assert!(String::from_utf8_lossy(&stderr).contains("Scanning 3 sessions"));
}
