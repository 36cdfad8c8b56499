#![cfg(all(unix, feature = "cli"))]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use embring_transport::{SerialStream, Transport, UnixDomainSocket};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/embring-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn wait_for_connect(path: &Path, timeout: Duration) -> SerialStream {
    let start = Instant::now();
    loop {
        match UnixDomainSocket::connect(path) {
            Ok(link) => return link,
            Err(err) => {
                if start.elapsed() >= timeout {
                    panic!("connect timeout: {err}");
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be json"))
        .collect()
}

#[test]
fn replay_file_prints_each_message() {
    let dir = unique_temp_dir("replay");
    let capture = dir.join("capture.bin");
    std::fs::write(
        &capture,
        [0xCD, 0x01, 0x02, 0xC1, 0x05, 0xC3, 0xC1, 0xCC],
    )
    .expect("capture should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_embring"))
        .args(["--log-level", "error", "--format", "json", "replay"])
        .arg(&capture)
        .args(["--capacity", "8", "--chunk", "3"])
        .output()
        .expect("replay should run");

    assert!(output.status.success());
    let messages = json_lines(&output.stdout);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["bytes"], "CD 01 02 C1");
    assert_eq!(messages[0]["fields"][0]["kind"], "u16");
    assert_eq!(messages[1]["bytes"], "05 C3 C1");
    assert_eq!(messages[1]["index"], 2);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_unknown_tag_exits_data_invalid() {
    let output = Command::new(env!("CARGO_BIN_EXE_embring"))
        .args(["--log-level", "error", "--format", "json", "replay"])
        .args(["--hex", "C9 C1"])
        .output()
        .expect("replay should run");

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized tag 0xC9"));
}

#[test]
fn replay_prints_complete_message_before_unknown_tag() {
    let output = Command::new(env!("CARGO_BIN_EXE_embring"))
        .args(["--log-level", "error", "--format", "json", "replay"])
        .args(["--hex", "CC 01 C1 C8"])
        .output()
        .expect("replay should run");

    assert_eq!(output.status.code(), Some(60));
    let messages = json_lines(&output.stdout);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["bytes"], "CC 01 C1");
}

#[test]
fn replay_rejects_bad_capacity() {
    let output = Command::new(env!("CARGO_BIN_EXE_embring"))
        .args(["--log-level", "error", "replay", "--hex", "C1", "--capacity", "1"])
        .output()
        .expect("replay should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn listen_frames_bytes_sent_over_the_link() {
    let dir = unique_temp_dir("listen");
    let sock_path = dir.join("link.sock");

    let child = Command::new(env!("CARGO_BIN_EXE_embring"))
        .args(["--log-level", "error", "--format", "json", "listen"])
        .arg(&sock_path)
        .args(["--count", "2", "--poll-interval", "5ms"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("listen should start");

    let mut link = wait_for_connect(&sock_path, Duration::from_secs(3));
    link.write_bytes(&[0xCE, 0x00, 0x00]).expect("first half");
    thread::sleep(Duration::from_millis(50));
    link.write_bytes(&[0x01, 0x00, 0xC1, 0xC2, 0xC1])
        .expect("second half");

    let output = child.wait_with_output().expect("listen should exit");
    assert!(output.status.success());

    let messages = json_lines(&output.stdout);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["bytes"], "CE 00 00 01 00 C1");
    assert_eq!(messages[1]["fields"][0]["kind"], "false");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_writes_raw_bytes() {
    let dir = unique_temp_dir("send");
    let sock_path = dir.join("link.sock");
    let listener = UnixDomainSocket::bind(&sock_path).expect("bind should succeed");

    let status = Command::new(env!("CARGO_BIN_EXE_embring"))
        .args(["--log-level", "error", "send"])
        .arg(&sock_path)
        .args(["--hex", "CC 2A C1"])
        .status()
        .expect("send should run");
    assert!(status.success());

    let mut link = listener.accept().expect("accept should succeed");
    let mut received = [0u8; 3];
    let mut filled = 0;
    while filled < received.len() {
        filled += link.read_into(&mut received[filled..]).expect("read");
    }
    assert_eq!(received, [0xCC, 0x2A, 0xC1]);

    drop(listener);
    let _ = std::fs::remove_dir_all(&dir);
}
