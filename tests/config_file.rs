use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

fn cargo_bin(config: &tempfile::NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("tapebf").unwrap();
    cmd.env("TAPEBF_CONFIG", config.path())
        .env_remove("TAPEBF_OUTPUT")
        .env_remove("TAPEBF_DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn config_selects_codepoint_output() {
    let cfg = config_file("[interpreter]\noutput = \"codepoint\"\n");
    cargo_bin(&cfg)
        .args(["run", "-."])
        .assert()
        .success()
        .stdout("ÿ");
}

#[test]
fn flag_overrides_config() {
    let cfg = config_file("[interpreter]\noutput = \"codepoint\"\n");
    let assert = cargo_bin(&cfg)
        .args(["run", "--output", "byte", "-."])
        .assert()
        .success();
    assert_eq!(assert.get_output().stdout, vec![255u8]);
}

#[test]
fn env_overrides_config() {
    let cfg = config_file("[interpreter]\noutput = \"codepoint\"\n");
    let assert = cargo_bin(&cfg)
        .env("TAPEBF_OUTPUT", "byte")
        .args(["run", "-."])
        .assert()
        .success();
    assert_eq!(assert.get_output().stdout, vec![255u8]);
}

#[test]
fn config_can_enable_debug() {
    let cfg = config_file("[interpreter]\ndebug = true\n");
    cargo_bin(&cfg)
        .args(["run", "+"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ip=0"));
}

#[test]
fn bad_config_value_warns_but_runs() {
    let cfg = config_file("[interpreter]\noutput = \"latin1\"\n");
    cargo_bin(&cfg)
        .args(["run", "++++++++[>++++++++<-]>."])
        .assert()
        .success()
        .stdout("@")
        .stderr(predicate::str::contains("unknown output encoding"));
}
