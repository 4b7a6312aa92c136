#![forbid(unsafe_code)]

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::tempdir;

fn cipherpad_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cipherpad"))
}

fn run(args: &[&str]) -> Output {
    Command::new(cipherpad_bin())
        .args(args)
        .env_remove("CIPHERPAD_LOG")
        .output()
        .expect("spawn cipherpad")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn render_prints_rendered_string() {
    let output = run(&["render", "--format", "4-letter", "ab", "cd", "ef"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "abcd ef\n");
}

#[test]
fn unknown_format_exits_with_code_two() {
    let output = run(&["render", "--format", "kebab", "ab"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown cipher format"), "{stderr}");
}

#[test]
fn settings_reads_partial_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"cipherFormat": "pascal"}"#).expect("write settings");

    let output = run(&["settings", "--file", path.to_str().expect("utf-8 path")]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(json["cipherFormat"], "pascal");
    assert_eq!(json["traditionalEnabled"], true);
    assert_eq!(json["theme"], "dark");
}

#[test]
fn session_replays_script_from_stdin() {
    let dir = tempdir().expect("tempdir");
    let book = dir.path().join("book.json");
    fs::write(
        &book,
        concat!(
            r#"{"codes": {"你": "abcd", "好": "efgh", "汉": "ijkl", "漢": "mnop"},"#,
            r#" "traditional": {"汉": "漢"}}"#,
        ),
    )
    .expect("write book");

    let mut child = Command::new(cipherpad_bin())
        .args(["session", "--book", book.to_str().expect("utf-8 path")])
        .env_remove("CIPHERPAD_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn cipherpad");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all("plain 你汉\nformat pascal\nundo\n".as_bytes())
        .expect("write script");
    let output = child.wait_with_output().expect("wait");

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "你漢\tabcd mnop\n你漢\tAbcdMnop\n你漢\tabcd mnop\n"
    );
}

#[test]
fn session_reports_bad_script_line() {
    let dir = tempdir().expect("tempdir");
    let book = dir.path().join("book.json");
    let script = dir.path().join("script.txt");
    fs::write(&book, r#"{"codes": {"你": "abcd"}}"#).expect("write book");
    fs::write(&script, "plain 你\nteleport\n").expect("write script");

    let output = run(&[
        "session",
        "--book",
        book.to_str().expect("utf-8 path"),
        script.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "你\tabcd\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}
