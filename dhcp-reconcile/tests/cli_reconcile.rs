use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dhcp-reconcile"));
    cmd.env("NO_COLOR", "1");
    cmd
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

const CONFIG: &str = r#"<conf>
  <system><hostname>edge</hostname></system>
  <interfaces>
    <lan><descr>LAN</descr><ipaddr>192.168.1.1</ipaddr><subnet>24</subnet></lan>
  </interfaces>
  <dhcpd><lan/></dhcpd>
</conf>"#;

const INPUT: &str = r#"{
  "ha_enabled": true,
  "role": "primary",
  "remote_name": "fw-b",
  "local_ip": "10.0.0.1",
  "remote_ip": "10.0.0.2",
  "interfaces": ["lan"]
}"#;

#[test]
fn reconcile_persists_settings_and_interface_delta() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.xml");
    let input = dir.path().join("input.json");
    let output = dir.path().join("out.xml");
    fs::write(&config, CONFIG).expect("config write");
    fs::write(&input, INPUT).expect("input write");

    bin()
        .arg("reconcile")
        .arg(path_as_str(&config))
        .arg("--family")
        .arg("v4")
        .arg("--input")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&output))
        .assert()
        .success()
        .stdout(predicate::str::contains("changed=true"))
        .stdout(predicate::str::contains("need_sync=true"))
        .stdout(predicate::str::contains("dirty: dhcpd"));

    let out = fs::read_to_string(&output).expect("read out");
    assert!(out.contains("<remotename>fw-b</remotename>"));
    assert!(out.contains("<localip>10.0.0.1</localip>"));
    assert!(out.contains("settings reconciled"));
    // The interface delta enabled lan in the per-interface area.
    let lan = out.find("<lan>").expect("dhcpd lan entry");
    assert!(out[lan..].contains("<enable/>"));
}

#[test]
fn second_identical_reconcile_is_a_no_op() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.xml");
    let input = dir.path().join("input.json");
    let output = dir.path().join("out.xml");
    fs::write(&config, CONFIG).expect("config write");
    fs::write(&input, INPUT).expect("input write");

    bin()
        .arg("reconcile")
        .arg(path_as_str(&config))
        .arg("--family")
        .arg("v4")
        .arg("--input")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&output))
        .assert()
        .success();

    bin()
        .arg("reconcile")
        .arg(path_as_str(&output))
        .arg("--family")
        .arg("v4")
        .arg("--input")
        .arg(path_as_str(&input))
        .assert()
        .success()
        .stdout(predicate::str::contains("changed=false"))
        .stdout(predicate::str::contains("dirty:").not());
}

#[test]
fn validation_errors_abort_without_writing() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.xml");
    let input = dir.path().join("input.json");
    let output = dir.path().join("out.xml");
    fs::write(&config, CONFIG).expect("config write");
    fs::write(&input, r#"{"ha_enabled": true}"#).expect("input write");

    bin()
        .arg("reconcile")
        .arg(path_as_str(&config))
        .arg("--family")
        .arg("v4")
        .arg("--input")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&output))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A remote name is required when High Availability is enabled.",
        ))
        .stderr(predicate::str::contains("local address is required"))
        .stderr(predicate::str::contains("remote address is required"));

    assert!(!output.exists());
}

#[test]
fn v6_family_uses_its_own_namespace() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.xml");
    let input = dir.path().join("input.json");
    let output = dir.path().join("out.xml");
    fs::write(&config, CONFIG).expect("config write");
    fs::write(
        &input,
        r#"{"ha_enabled": true, "remote_name": "fw-b", "local_ip": "2001:db8::1", "remote_ip": "2001:db8::2"}"#,
    )
    .expect("input write");

    bin()
        .arg("reconcile")
        .arg(path_as_str(&config))
        .arg("--family")
        .arg("v6")
        .arg("--input")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&output))
        .assert()
        .success()
        .stdout(predicate::str::contains("dirty: dhcpdv6"));

    let out = fs::read_to_string(&output).expect("read out");
    assert!(out.contains("<dhcp6>"));
    assert!(!out.contains("<dhcp4>"));
}
