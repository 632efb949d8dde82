use std::process::Command;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fidelity-cli"))
}

#[test]
fn test_cli_help() {
    let output = cli().args(["--help"]).output().expect("Failed to execute command");

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["evaluate", "polar", "regression", "motor"] {
        assert!(stdout.contains(command), "Should list {command} command");
    }
}

#[test]
fn test_cli_regression_passes() {
    let output = cli().args(["regression"]).output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Regression should pass: {stdout}");
    assert!(stdout.contains("cd_p_wing"));
    assert!(stdout.contains("All contributors within"));
}

#[test]
fn test_cli_evaluate_csv() {
    let output = cli()
        .args([
            "evaluate",
            "--mach", "0.78",
            "--altitude", "10668",
            "--lift-model", "reference",
            "--steps", "5",
            "-o", "csv",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "mach,altitude,alpha_deg,cl,cd,l_over_d");
    assert_eq!(lines.len(), 6);
}

#[test]
fn test_cli_evaluate_with_vehicle_file() {
    let vehicle = concat!(env!("CARGO_MANIFEST_DIR"), "/data/boeing_737.json");
    let output = cli()
        .args(["evaluate", "--vehicle", vehicle, "--alpha-start", "-2", "--steps", "3"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DRAG POLAR"));
}

#[test]
fn test_cli_polar_json() {
    let output = cli()
        .args(["polar", "--mach", "0.3,0.6", "--steps", "4", "-o", "json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let polars: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    let polars = polars.as_array().expect("Output should be a list of polars");
    assert_eq!(polars.len(), 2);
    assert_eq!(polars[1]["points"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_cli_motor() {
    let output = cli()
        .args([
            "motor",
            "--resistance", "0.008",
            "--no-load-current", "4.5",
            "--speed-constant", "5.0",
            "--voltage", "400,500",
            "-o", "json",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let points: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert_eq!(points.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_cli_missing_vehicle_file() {
    let output = cli()
        .args(["evaluate", "--vehicle", "/nonexistent/vehicle.json"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Missing vehicle file should fail");
}

#[test]
fn test_cli_invalid_command() {
    let output = cli().args(["invalid-command"]).output().expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");
}
