#![cfg(all(unix, feature = "cli"))]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/posebridge-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn wait_for_socket(path: &Path, timeout: Duration) {
    let start = Instant::now();
    while !path.exists() {
        if start.elapsed() >= timeout {
            panic!("listener did not bind {}", path.display());
        }
        thread::sleep(Duration::from_millis(25));
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::process::ExitStatus {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().expect("try_wait should succeed") {
            return status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            panic!("child did not exit in time");
        }
        thread::sleep(Duration::from_millis(25));
    }
}

fn spawn_listen(sock_path: &Path, extra: &[&str]) -> Child {
    Command::new(env!("CARGO_BIN_EXE_posebridge"))
        .args(["--log-level", "error", "--format", "json", "listen"])
        .arg("--endpoint")
        .arg(sock_path)
        .args(["--server-startup", "None", "--tick-hz", "200"])
        .args(extra)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("listen should start")
}

fn send(sock_path: &Path, count: u32) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_posebridge"))
        .args(["--log-level", "error", "--format", "json", "send"])
        .arg("--endpoint")
        .arg(sock_path)
        .args(["--count", &count.to_string(), "--rate-hz", "100"])
        .output()
        .expect("send should run")
}

#[test]
fn project_prints_reference_matrix_as_json() {
    let output = Command::new(env!("CARGO_BIN_EXE_posebridge"))
        .args([
            "--format",
            "json",
            "project",
            "--fov",
            "0.6,0.6,0.7,0.7",
            "--near",
            "1",
            "--far",
            "75000",
        ])
        .output()
        .expect("project should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"convention\":\"opengl\""), "{stdout}");
    assert!(stdout.contains("\"rows\":[[1.18724"), "{stdout}");
    assert!(stdout.contains("[0.0,0.0,-1.0,0.0]]"), "{stdout}");
}

#[test]
fn project_accepts_degrees_and_presets() {
    let output = Command::new(env!("CARGO_BIN_EXE_posebridge"))
        .args([
            "--format",
            "pretty",
            "project",
            "--fov",
            "45,45,45,45",
            "--degrees",
            "--planes",
            "cockpit",
            "--convention",
            "vulkan",
        ])
        .output()
        .expect("project should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("vulkan near=0.01 far=1000"), "{stdout}");
    // tan(45°) = 1, so the horizontal scale is 1 and Y is flipped.
    assert!(stdout.contains("1.000000"), "{stdout}");
    assert!(stdout.contains("-1.000000"), "{stdout}");
}

#[test]
fn listen_prints_view_sent_by_producer() {
    let dir = unique_temp_dir("listen");
    let sock_path = dir.join("headset.sock");

    let mut listener = spawn_listen(&sock_path, &["--count", "1", "--recentre-first"]);
    wait_for_socket(&sock_path, Duration::from_secs(3));

    let sent = send(&sock_path, 1);
    assert!(
        sent.status.success(),
        "{}",
        String::from_utf8_lossy(&sent.stderr)
    );
    assert!(String::from_utf8_lossy(&sent.stdout).contains("\"frames_sent\":1"));

    let status = wait_with_timeout(&mut listener, Duration::from_secs(5));
    assert!(status.success());

    let output = listener.wait_with_output().expect("output should be readable");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"seq\":1"), "{stdout}");
    assert!(stdout.contains("\"recentred\":true"), "{stdout}");
    assert!(stdout.contains("\"eye_separation\":0.06"), "{stdout}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn listen_exits_when_producer_disconnects() {
    let dir = unique_temp_dir("disconnect");
    let sock_path = dir.join("headset.sock");

    let mut listener = spawn_listen(&sock_path, &[]);
    wait_for_socket(&sock_path, Duration::from_secs(3));

    let sent = send(&sock_path, 3);
    assert!(sent.status.success());

    let status = wait_with_timeout(&mut listener, Duration::from_secs(5));
    assert!(status.success());
    assert!(!sock_path.exists(), "endpoint should be cleaned up");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_without_listener_fails() {
    let dir = unique_temp_dir("no-listener");
    let output = send(&dir.join("absent.sock"), 1);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("connect failed"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_reports_frame_size() {
    let output = Command::new(env!("CARGO_BIN_EXE_posebridge"))
        .args(["version", "--extended"])
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: posebridge"));
    assert!(stdout.contains("frame: 88 bytes (44 per eye)"));
}
