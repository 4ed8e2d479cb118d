//! CLI integration tests
//!
//! Drive the built binary the way a user would. The validate and plan
//! commands have no side effects, so they can run without media files.

use assert_cmd::Command;
use predicates::prelude::*;

fn clipgate() -> Command {
    Command::cargo_bin("clipgate").unwrap()
}

#[test]
fn validate_accepts_allow_listed_url() {
    clipgate()
        .args(["validate", "--url", "https://www.youtube.com/watch?v=abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn validate_rejects_unknown_host() {
    clipgate()
        .args(["validate", "--url", "https://evil.internal/payload"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Host not allowed"));
}

#[test]
fn validate_rejects_non_http_scheme() {
    clipgate()
        .args(["validate", "--url", "ftp://youtube.com/file"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Scheme not allowed"));
}

#[test]
fn validate_rejects_flag_shaped_input() {
    clipgate()
        .args(["validate", "--url=--exec=touch pwned"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed URL"));
}

#[test]
fn validate_honors_extra_allow_flag() {
    clipgate()
        .args([
            "validate",
            "--url",
            "https://media.example.com/v.mp4",
            "--allow",
            "example.com",
        ])
        .assert()
        .success();
}

#[test]
fn plan_without_stages_is_stream_copy() {
    clipgate()
        .args(["plan", "-i", "in.mp4", "-o", "out.mp4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-c copy"));
}

#[test]
fn plan_crop_json_emits_single_graph() {
    clipgate()
        .args([
            "plan", "-i", "in.mp4", "-o", "out.mp4", "--crop", "1080x1920", "--json",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("crop=1080:1920")
                .and(predicate::str::contains("\"stages\"")),
        );
}

#[test]
fn plan_rejects_out_of_range_crf() {
    clipgate()
        .args(["plan", "-i", "in.mp4", "-o", "out.mp4", "--crf", "99"])
        .assert()
        .failure();
}

#[test]
fn plan_rejects_bad_crop_geometry() {
    clipgate()
        .args(["plan", "-i", "in.mp4", "-o", "out.mp4", "--crop", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WIDTHxHEIGHT"));
}
