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

fn write_config(dir: &Path, xml: &str) -> std::path::PathBuf {
    let config = dir.join("config.xml");
    fs::write(&config, xml).expect("config write");
    config
}

#[test]
fn plain_daemon_branch_runs_daemon_then_firewall() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path(), "<conf/>");

    bin()
        .arg("apply")
        .arg(path_as_str(&config))
        .arg("--family")
        .arg("v4")
        .assert()
        .success()
        .stdout(predicate::str::contains("configure dhcp4 daemon"))
        .stdout(predicate::str::contains("recompile firewall rules"))
        .stdout(predicate::str::contains("apply plan complete"));
}

#[test]
fn dns_registration_branch_replaces_plain_daemon() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(
        dir.path(),
        "<conf><unbound><enable/><regdhcpstatic/></unbound></conf>",
    );

    bin()
        .arg("apply")
        .arg(path_as_str(&config))
        .arg("--family")
        .arg("v4")
        .assert()
        .success()
        .stdout(predicate::str::contains("configure DNS resolver"))
        .stdout(predicate::str::contains("configure dhcp4 daemon").not());
}

#[test]
fn kea_backend_suppresses_v4_dns_registration() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(
        dir.path(),
        "<conf><dhcpbackend>kea</dhcpbackend><unbound><enable/><regdhcpstatic/></unbound></conf>",
    );

    bin()
        .arg("apply")
        .arg(path_as_str(&config))
        .arg("--family")
        .arg("v4")
        .assert()
        .success()
        .stdout(predicate::str::contains("configure dhcp4 daemon"))
        .stdout(predicate::str::contains("configure DNS resolver").not());
}

#[test]
fn zone_transfer_resync_joins_the_plan() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(
        dir.path(),
        "<conf><installedpackages>\
         <bind><config><enable_bind>on</enable_bind></config></bind>\
         <bindzone><config><regdhcpstatic/></config></bindzone>\
         </installedpackages></conf>",
    );

    bin()
        .arg("apply")
        .arg(path_as_str(&config))
        .arg("--family")
        .arg("v4")
        .assert()
        .success()
        .stdout(predicate::str::contains("resync zone-transfer add-on"));
}
