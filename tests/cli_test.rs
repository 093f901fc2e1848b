//! Command line tests against raw image files

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const IMAGE: &str = "image.bin";

fn memory_inspector(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_memory-inspector"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    assert!(!output.status.success(), "command unexpectedly succeeded");
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// A 64-byte image mapped at 0x80000000 with DEADBEEF at offset 0x10
fn image_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut data = vec![0u8; 64];
    data[0x10..0x14].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    fs::write(dir.path().join(IMAGE), data).unwrap();
    dir
}

const FIND_DEADBEEF: [&str; 9] = [
    "find", "-i", IMAGE, "-b", "80000000", "-e", "u32", "--hex", "DEADBEEF",
];

#[test]
fn test_set_patches_image_in_place() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(IMAGE), vec![0u8; 64]).unwrap();

    let output = memory_inspector(
        dir.path(),
        &[
            "set", "-i", IMAGE, "-b", "80000000", "-a", "80000010", "-e", "u32", "--hex",
            "DEADBEEF",
        ],
    );
    assert!(stdout(&output).starts_with("Wrote 4 bytes at 80000010"));

    let mut expected = vec![0u8; 64];
    expected[0x10..0x14].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(fs::read(dir.path().join(IMAGE)).unwrap(), expected);
}

#[test]
fn test_set_with_output_keeps_source() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(IMAGE), vec![0u8; 8]).unwrap();

    let output = memory_inspector(
        dir.path(),
        &[
            "set", "-i", IMAGE, "-a", "4", "-o", "-2", "-e", "u16", "--hex", "--output",
            "patched.bin", "FFFE",
        ],
    );
    stdout(&output);

    assert_eq!(fs::read(dir.path().join(IMAGE)).unwrap(), vec![0u8; 8]);
    assert_eq!(
        fs::read(dir.path().join("patched.bin")).unwrap(),
        vec![0, 0, 0xFF, 0xFE, 0, 0, 0, 0]
    );
}

#[test]
fn test_find_resumes_after_explicit_address() {
    let dir = image_dir();

    let output = memory_inspector(dir.path(), &FIND_DEADBEEF);
    assert_eq!(stdout(&output).trim(), "Match Found: 80000010");

    let mut args = FIND_DEADBEEF.to_vec();
    args.extend(["-a", "80000010"]);
    let output = memory_inspector(dir.path(), &args);
    assert_eq!(stdout(&output).trim(), "No Match");

    let mut args = FIND_DEADBEEF.to_vec();
    args.extend(["-a", "80000030", "--backward"]);
    let output = memory_inspector(dir.path(), &args);
    assert_eq!(stdout(&output).trim(), "Match Found: 80000010");
}

#[test]
fn test_find_json_reports_hex_address() {
    let dir = image_dir();
    let mut args = vec!["--json"];
    args.extend(FIND_DEADBEEF);

    let output = memory_inspector(dir.path(), &args);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["result"], "found");
    assert_eq!(report["address"], "80000010");
}

#[test]
fn test_find_rejects_pattern_over_configured_limit() {
    let dir = image_dir();
    fs::write(
        dir.path().join("small.toml"),
        "[search]\nmax_pattern_len = 2\n",
    )
    .unwrap();

    let mut args = vec!["-c", "small.toml"];
    args.extend(FIND_DEADBEEF);
    let output = memory_inspector(dir.path(), &args);
    assert!(stderr(&output).contains("search pattern is 4 bytes, limit is 2"));

    let mut args = vec!["-c", "small.toml"];
    args.extend(["find", "-i", IMAGE, "-e", "u16", "--hex", "BEEF"]);
    let output = memory_inspector(dir.path(), &args);
    assert_eq!(stdout(&output).trim(), "Match Found: 00000012");
}

#[test]
fn test_find_reports_bad_address_first() {
    let dir = image_dir();
    let output = memory_inspector(
        dir.path(),
        &["find", "-i", IMAGE, "-a", "zz", "-e", "hexstr", "Z"],
    );
    assert!(stderr(&output).contains("Bad address provided"));
}

#[test]
fn test_load_copies_file_into_image() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(IMAGE), vec![0u8; 16]).unwrap();
    fs::write(dir.path().join("patch.bin"), [1u8, 2, 3]).unwrap();

    let output = memory_inspector(
        dir.path(),
        &["load", "-i", IMAGE, "-b", "100", "-a", "10c", "patch.bin"],
    );
    assert!(stdout(&output).starts_with("Wrote 3 bytes at 0000010c"));

    let mut expected = vec![0u8; 16];
    expected[12..15].copy_from_slice(&[1, 2, 3]);
    assert_eq!(fs::read(dir.path().join(IMAGE)).unwrap(), expected);
}

#[test]
fn test_load_past_image_end_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(IMAGE), vec![0u8; 4]).unwrap();
    fs::write(dir.path().join("patch.bin"), [1u8, 2, 3]).unwrap();

    let output = memory_inspector(dir.path(), &["load", "-i", IMAGE, "-a", "2", "patch.bin"]);
    assert!(stderr(&output).contains("leaves the region"));
    assert_eq!(fs::read(dir.path().join(IMAGE)).unwrap(), vec![0u8; 4]);
}

#[test]
fn test_dump_uses_configured_directory() {
    let dir = image_dir();
    let image = fs::read(dir.path().join(IMAGE)).unwrap();

    let output = memory_inspector(dir.path(), &["dump", "-i", IMAGE, "-k", "mem1"]);
    stdout(&output);
    assert_eq!(fs::read(dir.path().join("dump").join("mem1.raw")).unwrap(), image);

    let output = memory_inspector(
        dir.path(),
        &["dump", "-i", IMAGE, "-k", "auxiliary", "-d", "out"],
    );
    stdout(&output);
    assert_eq!(fs::read(dir.path().join("out").join("aram.raw")).unwrap(), image);
}

#[test]
fn test_resolve_and_encode() {
    let dir = TempDir::new().unwrap();

    let output = memory_inspector(dir.path(), &["resolve", "-a", "80000000", "-o", "-4"]);
    assert_eq!(stdout(&output).trim(), "7ffffffc");

    let output = memory_inspector(dir.path(), &["resolve", "-a", "0", "-o", "-1"]);
    assert!(stderr(&output).contains("Bad offset provided"));

    let output = memory_inspector(dir.path(), &["encode", "-e", "float", "3.14"]);
    assert_eq!(stdout(&output).trim(), "40 48 F5 C3");
}
