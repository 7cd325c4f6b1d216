//! Integration tests for the signature-to-image binary

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

const FIXTURE: &str = include_str!("fixtures/signature.json");

struct TestDir {
    path: PathBuf,
}

impl TestDir {
    fn new(tag: &str) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let path = std::env::temp_dir().join(format!(
            "signature_cli_{tag}_{}_{}",
            std::process::id(),
            ts
        ));
        fs::create_dir_all(&path).expect("create temp test dir");
        Self { path }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let file = self.path.join(name);
        fs::write(&file, content).expect("write test file");
        file
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_cli(args: &[&str], stdin: &str, cwd: &Path) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_signature-to-image"))
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn signature-to-image");
    // The process may exit before reading stdin (argument errors)
    let _ = child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(stdin.as_bytes());
    child.wait_with_output().expect("wait for signature-to-image")
}

fn png_size(bytes: &[u8]) -> (u32, u32) {
    let reader = png::Decoder::new(bytes).read_info().expect("valid PNG");
    let info = reader.info();
    (info.width, info.height)
}

#[test]
fn stdin_to_stdout_png() {
    let dir = TestDir::new("stdout");
    let output = run_cli(&[], FIXTURE, &dir.path);

    assert!(output.status.success(), "process failed: {output:?}");
    assert_eq!(png_size(&output.stdout), (198, 55));
}

#[test]
fn file_input_writes_png_file() {
    let dir = TestDir::new("file");
    let input = dir.write("sig.json", FIXTURE);
    let out = dir.path.join("sig.png");
    let output = run_cli(
        &[
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--auto-size",
            "--compression",
            "9",
        ],
        "",
        &dir.path,
    );

    assert!(output.status.success(), "process failed: {output:?}");
    assert!(output.stdout.is_empty());
    let written = fs::read(&out).expect("output file exists");
    assert_eq!(png_size(&written), (157, 36));
}

#[test]
fn data_uri_output() {
    let dir = TestDir::new("data_uri");
    let output = run_cli(&["--data-uri", "--width", "80", "--height", "30"], FIXTURE, &dir.path);

    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("data:image/png;base64,iVBORw0KGgo"),
        "expected a PNG data URI, got: {stdout}"
    );
}

#[test]
fn config_file_sets_defaults() {
    let dir = TestDir::new("config");
    let config = dir.write(
        "options.toml",
        "image_width = 64\nimage_height = 24\npen_colour = \"#000000\"\n",
    );
    let output = run_cli(&["-c", config.to_str().unwrap()], FIXTURE, &dir.path);

    assert!(output.status.success(), "process failed: {output:?}");
    assert_eq!(png_size(&output.stdout), (64, 24));
}

#[test]
fn invalid_json_fails() {
    let dir = TestDir::new("invalid");
    let output = run_cli(&[], "{not valid json", &dir.path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid signature input"),
        "expected invalid input error, got: {stderr}"
    );
}

#[test]
fn out_of_range_compression_is_rejected() {
    let dir = TestDir::new("compression");
    let output = run_cli(&["--compression", "12"], FIXTURE, &dir.path);
    assert!(!output.status.success());
}

#[test]
fn unreadable_config_is_reported() {
    let dir = TestDir::new("bad_config");
    let config = dir.write("options.toml", "pen_width = \"wide\"\n");
    let output = run_cli(&["-c", config.to_str().unwrap()], FIXTURE, &dir.path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid options: failed to parse options TOML"),
        "expected an options error, got: {stderr}"
    );
}
