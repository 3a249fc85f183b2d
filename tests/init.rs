use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_prlens"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "prlens init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".prlens.toml");
    assert!(config_path.exists(), ".prlens.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[sanitize]"));
    assert!(content.contains("[tickets]"));

    let config: prlens_core::PrlensConfig = toml::from_str(&content).unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".prlens.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_prlens"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let existing = std::fs::read_to_string(dir.path().join(".prlens.toml")).unwrap();
    assert_eq!(existing, "# existing");
}
