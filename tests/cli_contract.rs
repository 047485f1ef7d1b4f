use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn command_contract_print_args() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("pbalign")?;
    let output = cmd
        .arg("contract")
        .arg("tests/pbalign/rtc.json")
        .arg("--print-args")
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 10);
    assert_eq!(stdout.lines().next(), Some("movie.subreadset.xml"));
    assert!(stdout.contains("--nproc\n12\n"));
    assert!(!stdout.contains("--concordant"));
    assert!(stdout
        .lines()
        .any(|l| l == "--algorithmOptions=\"-minMatch 12 -bestn 10 -minPctSimilarity 70.0\""));

    Ok(())
}

#[test]
fn command_contract_resolve() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("pbalign")?;
    let output = cmd.arg("contract").arg("tests/pbalign/rtc.json").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("outputFileName\taligned.subreads.xml\tcli\n"));
    assert!(stdout.contains("nproc\t12\tcli\n"));
    assert!(stdout.contains("minAccuracy\t75\tcli\n"));
    assert!(stdout.contains("concordant\tfalse\tdefault\n"));
    assert!(stdout.contains(
        "algorithmOptions\t-minMatch 12 -bestn 10 -minPctSimilarity 70.0\tcli\n"
    ));

    Ok(())
}

#[test]
fn command_contract_missing_output() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let rtc = tempdir.path().join("rtc.json");
    std::fs::write(
        &rtc,
        r#"{"resolved_tool_contract": {"input_files": ["a.xml", "b.xml"], "output_files": []}}"#,
    )?;

    let mut cmd = Command::cargo_bin("pbalign")?;
    cmd.arg("contract").arg(&rtc);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("expected one output file"));

    tempdir.close()?;
    Ok(())
}
