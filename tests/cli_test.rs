use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn fixture(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_ready_site_resolves_to_completed() {
    let file = fixture(
        r#"{
            "country": "US",
            "plugins": { "woo_payments": { "version": "3.3.0", "active": true } },
            "accounts": [{
                "gateway_id": "woocommerce-payments",
                "status": "complete",
                "has_pending_requirements": false,
                "has_overdue_requirements": false,
                "current_deadline": null,
                "is_live": true,
                "is_in_test_mode": false
            }],
            "cod_gateway_enabled": true
        }"#,
    );

    let mut cmd = Command::new(cargo_bin!("tapready"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"state\":\"completed\""))
        .stdout(predicate::str::contains("woo_payments"));
}

#[test]
fn test_unsupported_country() {
    let file = fixture(r#"{ "country": "ES" }"#);

    let mut cmd = Command::new(cargo_bin!("tapready"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("country_not_supported"));
}

#[test]
fn test_missing_plugin() {
    let file = fixture(r#"{ "country": "US", "cod_gateway_enabled": true }"#);

    let mut cmd = Command::new(cargo_bin!("tapready"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("plugin_not_installed"));
}

#[test]
fn test_malformed_fixture_fails() {
    let file = fixture("not json at all");

    let mut cmd = Command::new(cargo_bin!("tapready"));
    cmd.arg(file.path());

    cmd.assert().failure();
}
