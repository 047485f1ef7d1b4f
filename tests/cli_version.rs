use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn command_version_help() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("pbalign")?;
    let output = cmd.arg("version").arg("--help").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("Probes the version of an external tool"));
    Ok(())
}

#[test]
fn command_version_missing_tool() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("pbalign")?;
    cmd.arg("version").arg("pbalign-no-such-tool");
    cmd.assert()
        .success()
        .stdout("pbalign-no-such-tool\t0.1.19\tbaseline\n");

    Ok(())
}

#[test]
fn command_version_samtools() -> anyhow::Result<()> {
    if which::which("samtools").is_err() {
        eprintln!("Skipping command_version_samtools: samtools not installed");
        return Ok(());
    }

    let mut cmd = Command::cargo_bin("pbalign")?;
    let output = cmd.arg("version").arg("samtools").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("samtools\t"));

    Ok(())
}
