mod common;

use assert_fs::{prelude::PathChild, TempDir};
use common::*;
use predicates::prelude::{predicate, PredicateBooleanExt};

#[test]
fn test_check_ok() -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance("check", GROUPED_12)?;
    cmd.assert().success();
    file.close()?;
    Ok(())
}

#[test]
fn test_check_invalid_size() -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance("check", TOO_SMALL)?;
    cmd.assert().failure().code(1);
    file.close()?;
    Ok(())
}

#[test]
fn test_encode_wcnf() -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance("encode", GROUPED_7)?;
    cmd.assert().success().stdout(
        predicate::str::starts_with("c seating of 7 students, 4 at 2-seat tables\n")
            .and(predicate::str::contains("\nh "))
            .and(predicate::str::ends_with("\n3 56 0\n")),
    );
    file.close()?;
    Ok(())
}

#[test]
fn test_encode_wcnf_legacy() -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance("encode", GROUPED_7)?;
    cmd.arg("--format")
        .arg("wcnf-legacy")
        .arg("--mode")
        .arg("min")
        .assert()
        .success()
        .stdout(predicate::str::contains("\np wcnf ").and(predicate::str::contains("\nh ").not()));
    file.close()?;
    Ok(())
}

#[test]
fn test_encode_lp_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance("encode", GROUPED_7)?;
    let dir = TempDir::new()?;
    let output = dir.child("model.lp");
    cmd.arg("--format")
        .arg("lp")
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let content = std::fs::read_to_string(output.path())?;
    assert!(content.starts_with("\\ seating of 7 students, 4 at 2-seat tables\nMaximize\n"));
    assert!(content.contains(
        " obj: 2 x_1_2 + 2 x_3_4 + 2 x_5_6 + 2 x_5_7 + 2 x_6_7 + 3 x_5_6_7\n"
    ));
    assert!(content.ends_with("\nEnd\n"));
    file.close()?;
    dir.close()?;
    Ok(())
}

#[test]
fn test_encode_invalid_mode() -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance("encode", GROUPED_7)?;
    cmd.arg("--mode")
        .arg("both")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty());
    file.close()?;
    Ok(())
}
