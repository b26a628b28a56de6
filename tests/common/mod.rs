use std::process::{Command, Output};

use tempfile::TempDir;

pub fn base_cmd(data_dir: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_profile-service"));
    command
        .env("DOTENV_PATH", data_dir.path().join("missing.env"))
        .env("RUST_LOG", "warn")
        .env_remove("PROFILES_ZIP_TABLE")
        .arg("--data-dir")
        .arg(data_dir.path());
    command
}

pub fn write_form(dir: &TempDir, name: &str, form: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, form.to_string()).expect("write form");
    path
}

pub fn run(command: &mut Command) -> Output {
    command.output().expect("run profile-service")
}

pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

pub fn db_exists(data_dir: &TempDir) -> bool {
    data_dir.path().join("profiles.sqlite").exists()
}
