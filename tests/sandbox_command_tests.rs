//! Tests for `saltsolo sandbox`

mod common;

use common::{TestWorkspace, saltsolo_cmd};
use predicates::prelude::*;

#[test]
fn test_sandbox_into_directory() {
    let ws = TestWorkspace::new();
    let config = ws.write_config("grains:\n  role: web\nsalt_minion_id: web01\n");

    saltsolo_cmd()
        .arg("sandbox")
        .arg("--config")
        .arg(&config)
        .arg("--sandbox")
        .arg(ws.sandbox())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("etc/salt/minion"))
        .stdout(predicate::str::contains("etc/salt/grains"))
        .stdout(predicate::str::contains("Install command:"))
        .stdout(predicate::str::contains("Run command:"))
        .stdout(predicate::str::contains("--id=web01"));

    assert!(ws.read_sandbox_file("etc/salt/grains").contains("role: web"));
    assert!(ws.read_sandbox_file("etc/salt/minion").contains("id: web01"));
    assert!(ws.sandbox_file_exists("dependencies.sh"));
}

#[test]
fn test_sandbox_default_temporary_directory() {
    let output = saltsolo_cmd().arg("sandbox").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.lines().next().unwrap();
    let path = first.rsplit(' ').next().unwrap();
    let sandbox = std::path::Path::new(path);

    assert!(sandbox.join("etc/salt/minion").is_file());
    std::fs::remove_dir_all(sandbox).unwrap();
}

#[test]
fn test_sandbox_mine_and_dropins() {
    let ws = TestWorkspace::new();
    let mine = ws.write_file("mine.yaml", "web01: {ip: 10.0.0.1}\n");
    let a = ws.write_file("conf/a.conf", "a: 1\n");
    let b = ws.write_file("conf/b.conf", "b: 1\n");
    let config = ws.write_config(&format!(
        "mine-from-files: [{}]\nmine:\n  db01: {{ip: 10.0.0.2}}\nsalt_minion_config_dropin_files: [{}, {}]\n",
        mine.display(),
        a.display(),
        b.display()
    ));

    saltsolo_cmd()
        .arg("sandbox")
        .arg("--config")
        .arg(&config)
        .arg("--sandbox")
        .arg(ws.sandbox())
        .assert()
        .success();

    assert!(ws.sandbox_file_exists("srv/mine/web01"));
    assert!(ws.sandbox_file_exists("srv/mine/db01"));
    assert!(ws.sandbox_file_exists("etc/salt/minion.d/98-a.conf"));
    assert!(ws.sandbox_file_exists("etc/salt/minion.d/99-b.conf"));
}

#[test]
fn test_sandbox_bad_mine_file() {
    let ws = TestWorkspace::new();
    let mine = ws.write_file("mine.yaml", "web01: [unclosed\n");
    let config = ws.write_config(&format!("mine-from-files: [{}]\n", mine.display()));

    saltsolo_cmd()
        .arg("sandbox")
        .arg("--config")
        .arg(&config)
        .arg("--sandbox")
        .arg(ws.sandbox())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse data source"))
        .stderr(predicate::str::contains("mine.yaml"));
}

#[test]
fn test_sandbox_data_path_filtered() {
    let ws = TestWorkspace::new();
    ws.write_file("data/top.sls", "base: {}\n");
    ws.write_file("data/.git/config", "[core]\n");
    let config = ws.write_config(&format!(
        "data_path: {}\nsalt_copy_filter: ['.git']\n",
        ws.path.join("data").display()
    ));

    saltsolo_cmd()
        .arg("sandbox")
        .arg("--config")
        .arg(&config)
        .arg("--sandbox")
        .arg(ws.sandbox())
        .assert()
        .success();

    assert!(ws.sandbox_file_exists("data/top.sls"));
    assert!(!ws.sandbox_file_exists("data/.git"));
}

#[test]
fn test_sandbox_mock_mine_reachable_from_minion() {
    let ws = TestWorkspace::new();
    let mock = ws.write_file("mock-mine.yaml", "web01:\n  network.ip_addrs: [10.0.0.1]\n");
    let config = ws.write_config(&format!(
        "mock-mine: {}\nstate_top:\n  base:\n    '*': [mock.mine]\n",
        mock.display()
    ));

    saltsolo_cmd()
        .arg("sandbox")
        .arg("--config")
        .arg(&config)
        .arg("--sandbox")
        .arg(ws.sandbox())
        .assert()
        .success();

    let minion = ws.read_sandbox_file("etc/salt/minion");
    assert!(minion.contains("    - /tmp/kitchen/srv/salt\n"), "{minion}");
    assert!(ws.sandbox_file_exists("srv/salt/mock/mine.sls"));
    assert!(ws.sandbox_file_exists("srv/salt/_states/mock.py"));
    assert!(ws.sandbox_file_exists("srv/salt/top.sls"));
}
