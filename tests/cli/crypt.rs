//! Tests for `matchbook encrypt` and `matchbook decrypt`.

use crate::skip_without_openssl;
use crate::support::*;
use std::fs;

fn checkout(t: &Test) -> std::path::PathBuf {
    let root = t.dir.path().join("store");
    write(&root, "certs/development/ABC.cer", CERT);
    write(&root, "certs/development/ABC.p12", P12);
    write(&root, "README.md", b"readme");
    root
}

#[test]
fn test_encrypt_then_decrypt() {
    skip_without_openssl!();
    let t = Test::new();
    let root = checkout(&t);

    let output = t.encrypt("store", "hunter2");
    assert_success(&output);
    assert_stdout_contains(&output, "encrypted 2 files");
    let armored = fs::read_to_string(root.join("certs/development/ABC.cer")).unwrap();
    assert!(armored.starts_with("U2FsdGVkX1"));
    assert_file(&root.join("README.md"), b"readme");

    let output = t.decrypt("store", "hunter2");
    assert_success(&output);
    assert_stdout_contains(&output, "decrypted 2 files");
    assert_file(&root.join("certs/development/ABC.cer"), CERT);
    assert_file(&root.join("certs/development/ABC.p12"), P12);
}

#[test]
fn test_blank_password_refused() {
    skip_without_openssl!();
    let t = Test::new();
    let root = checkout(&t);

    let output = t.encrypt("store", "");
    assert_failure(&output);
    assert_stderr_contains(&output, "no passphrase supplied");
    assert_file(&root.join("certs/development/ABC.cer"), CERT);
}

#[test]
fn test_wrong_password_reports_override() {
    skip_without_openssl!();
    let t = Test::new();
    let root = checkout(&t);
    assert_success(&t.encrypt("store", "hunter2"));
    let encrypted = fs::read(root.join("certs/development/ABC.p12")).unwrap();

    let output = t.decrypt("store", "hunter3");
    assert_failure(&output);
    assert_stderr_contains(&output, "MATCH_PASSWORD");
    assert_file(&root.join("certs/development/ABC.p12"), &encrypted);
}

#[test]
fn test_decrypt_empty_checkout_needs_no_passphrase() {
    skip_without_openssl!();
    let t = Test::new();
    fs::create_dir_all(t.dir.path().join("empty")).unwrap();

    let output = t
        .cmd()
        .args(["decrypt", "empty", "--git-url", "https://example.com/certs.git"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "decrypted 0 files");
}
