#![cfg(all(unix, feature = "cli"))]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/noisechan-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn corpus_file(tag: &str) -> (PathBuf, PathBuf) {
    let dir = unique_temp_dir(tag);
    let corpus = dir.join("corpus.txt");
    std::fs::write(&corpus, "alpha\nbeta\ngamma\ndelta\nepsilon\n").expect("corpus should be writable");
    (dir, corpus)
}

fn noisechan() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_noisechan"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn node_sender_writes_ascii_bits() {
    let (dir, corpus) = corpus_file("sender");
    let mut child = noisechan()
        .arg("node")
        .arg("--corpus")
        .arg(&corpus)
        .arg("sender")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("node should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"Alpha beta gamma.\n")
        .expect("stdin should accept the sentence");
    let output = child.wait_with_output().expect("node should finish");

    assert!(output.status.success());
    // start bit, count 0, indices 0, 1, 2, newline
    let expected = format!(
        "1{}{}{}{}\n",
        "00",
        format!("{:016b}", 0),
        format!("{:016b}", 1),
        format!("{:016b}", 2)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn node_receiver_skips_padding() {
    let (dir, corpus) = corpus_file("receiver");
    let bits = format!(
        "0000001{}{}{}{}0",
        "00",
        format!("{:016b}", 4),
        format!("{:016b}", 3),
        format!("{:016b}", 0)
    );
    let mut child = noisechan()
        .arg("node")
        .arg("--corpus")
        .arg(&corpus)
        .arg("receiver")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("node should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(bits.as_bytes())
        .expect("stdin should accept bits");
    let output = child.wait_with_output().expect("node should finish");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "The string returned by the receiver is \"Epsilon delta alpha.\"\n"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn node_rejects_unknown_role() {
    let (dir, corpus) = corpus_file("role");
    let output = noisechan()
        .arg("node")
        .arg("--corpus")
        .arg(&corpus)
        .arg("relay")
        .stdin(Stdio::null())
        .output()
        .expect("node should run");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("relay"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn node_receiver_fails_on_truncated_stream() {
    let (dir, corpus) = corpus_file("truncated");
    let output = noisechan()
        .arg("node")
        .arg("--corpus")
        .arg(&corpus)
        .arg("receiver")
        .stdin(Stdio::null())
        .output()
        .expect("node should run");

    assert_eq!(output.status.code(), Some(1));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn sentence_is_reproducible_for_a_seed() {
    let (dir, corpus) = corpus_file("sentence");
    let run = || {
        noisechan()
            .arg("sentence")
            .arg("-c")
            .arg(&corpus)
            .args(["-s", "11", "-w", "2", "4"])
            .output()
            .expect("sentence should run")
    };

    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let line = String::from_utf8_lossy(&first.stdout).trim_end().to_string();
    assert!(line.ends_with('.'));
    assert!(line.starts_with(char::is_uppercase));
    let words: Vec<_> = line.trim_end_matches('.').split(' ').collect();
    assert!((2..=4).contains(&words.len()), "sentence: {line}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn sentence_rejects_reversed_word_range() {
    let (dir, corpus) = corpus_file("range");
    let output = noisechan()
        .arg("sentence")
        .arg("-c")
        .arg(&corpus)
        .args(["-w", "5", "2"])
        .output()
        .expect("sentence should run");

    assert_eq!(output.status.code(), Some(64));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = noisechan()
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("noisechan {}", env!("CARGO_PKG_VERSION"))
    );
}
