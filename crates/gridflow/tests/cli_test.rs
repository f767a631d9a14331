#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const VALID_CONFIG: &str = r#"
project "sample-grid"

environment "Development" {
    account "976921358976"
    region "us-east-1"
}

network {
    name "lab81-proj-vpc"
    max-azs 2
    nat-gateways 1
}

dns {
    zone-id "Z04123456789ABCDEFGHI"
    zone-name "kenkenaws.pro"
}

tls {
    certificate-arn "arn:aws:acm:us-east-1:976921358976:certificate/abc"
}
"#;

/// 設定ファイルを置いたテンポラリディレクトリを作り、環境変数で指定する
fn grid_with_config(config: &str) -> (tempfile::TempDir, Command) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("gridflow.kdl");
    fs::write(&config_path, config).unwrap();

    let mut cmd = Command::cargo_bin("grid").unwrap();
    cmd.env("GRIDFLOW_CONFIG_PATH", &config_path);
    (temp_dir, cmd)
}

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("grid").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("synth"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("destroy"));
}

/// バージョン表示が正しく動作することを確認
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("grid").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gridflow"));
}

/// synthがCloudFormationテンプレートを出力することを確認
#[test]
fn test_synth_emits_template() {
    let (_temp_dir, mut cmd) = grid_with_config(VALID_CONFIG);
    cmd.arg("synth")
        .assert()
        .success()
        .stdout(predicate::str::contains("AWSTemplateFormatVersion"))
        .stdout(predicate::str::contains("PublicSubnet1"))
        .stdout(predicate::str::contains("AWS::ElasticLoadBalancingV2::Listener"))
        .stdout(predicate::str::contains("kenkenaws.pro."));
}

/// synth -o がファイルへ書き出すことを確認
#[test]
fn test_synth_writes_output_file() {
    let (temp_dir, mut cmd) = grid_with_config(VALID_CONFIG);
    let out_path = temp_dir.path().join("template.json");

    cmd.arg("synth")
        .arg("--output")
        .arg(&out_path)
        .assert()
        .success();

    let body = fs::read_to_string(&out_path).unwrap();
    assert!(body.contains("AWSTemplateFormatVersion"));
    assert!(body.contains("AWS::AutoScaling::AutoScalingGroup"));
}

/// validateが解決結果のサマリーを表示することを確認
#[test]
fn test_validate_success_summary() {
    let (_temp_dir, mut cmd) = grid_with_config(VALID_CONFIG);
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Development-lab81-proj-vpc"));
}

/// 必須フィールド欠落時にvalidateがフィールド名を報告して失敗することを確認
#[test]
fn test_validate_reports_missing_field() {
    let config = r#"
        network { name "lab81-proj-vpc" }
    "#;
    let (_temp_dir, mut cmd) = grid_with_config(config);
    cmd.arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment_name"));
}

/// 外部参照フィールドが空のとき失敗することを確認
#[test]
fn test_validate_rejects_empty_certificate() {
    let config = r#"
        environment "Development"
        dns {
            zone-id "Z04123456789ABCDEFGHI"
            zone-name "kenkenaws.pro"
        }
        tls {
            certificate-arn ""
        }
    "#;
    let (_temp_dir, mut cmd) = grid_with_config(config);
    cmd.arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("certificate_arn"));
}

/// 設定ファイルがない場合にエラー終了することを確認
#[test]
fn test_missing_config_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("grid").unwrap();
    cmd.env_remove("GRIDFLOW_CONFIG_PATH")
        .env("XDG_CONFIG_HOME", temp_dir.path())
        .current_dir(temp_dir.path())
        .arg("validate")
        .assert()
        .failure();
}

/// --yes なしのdeployは確認メッセージのみで終了する（AWSには触れない）
#[test]
fn test_deploy_without_yes_stops_at_confirmation() {
    let (_temp_dir, mut cmd) = grid_with_config(VALID_CONFIG);
    cmd.arg("deploy")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
}

/// --yes なしのdestroyも同様
#[test]
fn test_destroy_without_yes_stops_at_confirmation() {
    let (_temp_dir, mut cmd) = grid_with_config(VALID_CONFIG);
    cmd.arg("destroy")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
}

/// 不正なコマンドでエラーになることを確認
#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("grid").unwrap();
    cmd.arg("invalid-command").assert().failure();
}
