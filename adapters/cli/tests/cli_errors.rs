use std::process::Command;

#[test]
fn invalid_parameter_exits_with_visible_error_and_no_output() {
    let out_dir = std::env::temp_dir().join(format!("growth-model-cli-{}", std::process::id()));

    let output = Command::new(env!("CARGO_BIN_EXE_growth-model"))
        .args(["--complexity-cap", "0", "--out-dir"])
        .arg(&out_dir)
        .output()
        .expect("failed to launch growth-model binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("complexity cap"), "stderr: {stderr}");
    assert!(!out_dir.exists(), "a failed pass must not write artifacts");
}

#[test]
fn failure_is_reported_once() {
    let output = Command::new(env!("CARGO_BIN_EXE_growth-model"))
        .args(["--complexity-cap", "0"])
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch growth-model binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let reports = stderr
        .lines()
        .filter(|line| line.contains("complexity cap"))
        .count();
    assert_eq!(reports, 1, "stderr: {stderr}");
    assert!(!stderr.contains("ERROR"), "stderr: {stderr}");
}

#[test]
fn out_of_range_flag_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_growth-model"))
        .args(["--efficiency", "7.5"])
        .output()
        .expect("failed to launch growth-model binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Efficiency must lie within"), "stderr: {stderr}");
}
