use assert_cmd::prelude::*;
use color_eyre::Result;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn manifest(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

const STRESS_CHAOS: &str = r#"
apiVersion: chaos-mesh.org/v1alpha1
kind: StressChaos
metadata:
  name: burn
  namespace: chaos-testing
spec:
  mode: one
  selector:
    labelSelectors:
      app: web
  stressors:
    memory:
      workers: 2
      size: 256MiB
    cpu:
      workers: 1
      load: 40
"#;

#[test]
fn test_stress_chaos_is_compiled() -> Result<()> {
    let file = manifest(STRESS_CHAOS)?;

    let output = Command::cargo_bin("chaosflow")?
        .arg("stress")
        .arg(file.path())
        .output()?;

    assert!(
        output.status.success(),
        "stress failed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "--vm 2 --vm-keep --vm-bytes 268435456 --cpu 1 --cpu-load 40"
    );

    Ok(())
}

#[test]
fn test_raw_stressng_stressors_win() -> Result<()> {
    let file = manifest(
        r#"
kind: StressChaos
metadata:
  name: raw
spec:
  mode: all
  stressngStressors: "--cpu 2 --timeout 30s"
  stressors:
    memory:
      workers: 1
      size: lots
"#,
    )?;

    let output = Command::cargo_bin("chaosflow")?
        .arg("stress")
        .arg(file.path())
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "--cpu 2 --timeout 30s"
    );

    Ok(())
}

#[test]
fn test_workflow_template_filter() -> Result<()> {
    let file = manifest(
        r#"
apiVersion: chaos-mesh.org/v1alpha1
kind: Workflow
metadata:
  name: try-workflow
  namespace: chaos-testing
spec:
  entry: entry
  templates:
    - name: entry
      templateType: Serial
      children: [memory-burn, cpu-burn]
    - name: memory-burn
      templateType: StressChaos
      deadline: 30s
      stressChaos:
        mode: one
        stressors:
          memory:
            workers: 4
            size: 50%
    - name: cpu-burn
      templateType: StressChaos
      deadline: 30s
      stressChaos:
        mode: one
        stressors:
          cpu:
            workers: 3
"#,
    )?;

    let output = Command::cargo_bin("chaosflow")?
        .args(["stress", "--template", "memory-burn"])
        .arg(file.path())
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "--vm 4 --vm-keep --vm-bytes 50%"
    );

    Ok(())
}

#[test]
fn test_malformed_size_is_rejected() -> Result<()> {
    let file = manifest(
        r#"
kind: StressChaos
metadata:
  name: broken
spec:
  mode: one
  stressors:
    memory:
      workers: 1
      size: lots
"#,
    )?;

    let output = Command::cargo_bin("chaosflow")?
        .arg("stress")
        .arg(file.path())
        .output()?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    Ok(())
}

#[test]
fn test_no_stress_chaos_found() -> Result<()> {
    let file = manifest("kind: ConfigMap\nmetadata:\n  name: unrelated\n")?;

    let output = Command::cargo_bin("chaosflow")?
        .arg("stress")
        .arg(file.path())
        .output()?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No stress chaos found"));

    Ok(())
}

#[test]
fn test_blank_raw_stressors_still_validate() -> Result<()> {
    let file = manifest(
        r#"
kind: StressChaos
metadata:
  name: overloaded
spec:
  mode: one
  stressngStressors: "  "
  stressors:
    cpu:
      workers: 1
      load: 150
"#,
    )?;

    let output = Command::cargo_bin("chaosflow")?
        .arg("stress")
        .arg(file.path())
        .output()?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid stressors in overloaded"));

    Ok(())
}
