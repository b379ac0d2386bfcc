use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn hook(project: &Path, path_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lint-on-save").unwrap();
    cmd.env("CLAUDE_PROJECT_DIR", project)
        .env("PATH", path_dir)
        .env_remove("LINT_ON_SAVE_CONFIG")
        .env_remove("CLAUDE_PLUGIN_ROOT")
        .env_remove("CLAUDE_HOOK_DEBUG");
    cmd
}

fn input(file: &Path) -> String {
    serde_json::json!({
        "tool_name": "Edit",
        "tool_input": { "file_path": file }
    })
    .to_string()
}

#[test]
fn test_no_file_path_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    hook(dir.path(), dir.path())
        .write_stdin(r#"{"tool_name": "Edit", "tool_input": {}}"#)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_malformed_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    hook(dir.path(), dir.path())
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON input"));
}

#[test]
fn test_nonexistent_file_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("package.json"), "{}").unwrap();
    hook(dir.path(), dir.path())
        .write_stdin(input(&dir.path().join("gone.js")))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_linters_block_with_exit_1() {
    let dir = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("package.json"), "{}").unwrap();
    let file = dir.path().join("app.test.js");
    fs::write(&file, "let x = 1\n").unwrap();

    let output = hook(dir.path(), empty_path.path())
        .write_stdin(input(&file))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["decision"], "block");
    let reason = value["reason"].as_str().unwrap();
    assert!(reason.contains("- ESLint: npm install --save-dev eslint"));
    assert!(reason.contains("- Prettier: npm install --save-dev prettier"));
    assert_eq!(value["hookSpecificOutput"]["hookEventName"], "PostToolUse");
}

#[test]
fn test_missing_plugin_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.py");
    fs::write(&file, "").unwrap();

    hook(dir.path(), dir.path())
        .env("CLAUDE_PLUGIN_ROOT", dir.path().join("no-plugin"))
        .write_stdin(input(&file))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read linter config"));
}

#[test]
fn test_invalid_placeholder_in_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.py");
    fs::write(&file, "").unwrap();
    let config = dir.path().join("linters.json");
    fs::write(
        &config,
        r#"{"languages": [{"id": "python", "extensions": [".py"], "linters": [
            {"name": "Ruff", "command": "ruff check {path}", "binary": "ruff"}
        ]}]}"#,
    )
    .unwrap();

    hook(dir.path(), dir.path())
        .env("LINT_ON_SAVE_CONFIG", &config)
        .write_stdin(input(&file))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown placeholder"));
}

#[cfg(unix)]
mod with_fake_linters {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn install_script(bin: &Path, name: &str, body: &str) {
        let path = bin.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_clean_ruff_run_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ruff.toml"), "").unwrap();
        let file = dir.path().join("app.py");
        fs::write(&file, "import os\n").unwrap();
        install_script(bin.path(), "ruff", "exit 0");

        hook(dir.path(), bin.path())
            .write_stdin(input(&file))
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn test_ruff_errors_block_with_exit_0() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ruff.toml"), "").unwrap();
        let file = dir.path().join("app.py");
        fs::write(&file, "def broken(:\n").unwrap();
        install_script(bin.path(), "ruff", "echo \"E999 SyntaxError\" >&2\nexit 1");

        hook(dir.path(), bin.path())
            .write_stdin(input(&file))
            .assert()
            .success()
            .stdout(predicate::str::contains("\"decision\":\"block\""))
            .stdout(predicate::str::contains("Ruff errors:\\nE999 SyntaxError"))
            .stdout(predicate::str::contains("lint-fixer skill"));
    }

    #[test]
    fn test_silent_failure_warns_and_allows() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ruff.toml"), "").unwrap();
        let file = dir.path().join("app.py");
        fs::write(&file, "").unwrap();
        install_script(bin.path(), "ruff", "exit 1");

        hook(dir.path(), bin.path())
            .write_stdin(input(&file))
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(
                "Warning: Ruff exited with status 1 and no output",
            ));
    }

    #[test]
    fn test_unlaunchable_linter_warns_and_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ruff.toml"), "").unwrap();
        let file = dir.path().join("app.py");
        fs::write(&file, "").unwrap();
        // Executable on PATH, but its interpreter does not exist
        let ruff = bin.path().join("ruff");
        fs::write(&ruff, "#!/nonexistent/interpreter\n").unwrap();
        fs::set_permissions(&ruff, fs::Permissions::from_mode(0o755)).unwrap();

        hook(dir.path(), bin.path())
            .write_stdin(input(&file))
            .assert()
            .success()
            .stdout(predicate::str::contains("\"decision\":\"block\""))
            .stdout(predicate::str::contains("Ruff could not be started"))
            .stderr(predicate::str::contains("Warning: Ruff not available"));
    }

    #[test]
    fn test_rerun_after_fix_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ruff.toml"), "").unwrap();
        let file = dir.path().join("app.py");
        fs::write(&file, "import os\n").unwrap();
        // Fails until `--fix` has run once in the project root
        install_script(
            bin.path(),
            "ruff",
            r#"printf '%s\n' "$*" >> calls.log
case "$*" in *--fix*) : > fixed.stamp; exit 0;; esac
[ -f fixed.stamp ] && exit 0
echo "F401 unused import"
exit 1"#,
        );

        for _ in 0..2 {
            hook(dir.path(), bin.path())
                .write_stdin(input(&file))
                .assert()
                .success()
                .stdout(predicate::str::is_empty());
        }

        let calls = fs::read_to_string(dir.path().join("calls.log")).unwrap();
        let calls: Vec<_> = calls.lines().collect();
        assert_eq!(calls.len(), 3, "{calls:?}");
        assert!(calls[0].starts_with("check ") && !calls[0].contains("--fix"));
        assert!(calls[1].starts_with("check --fix "));
        assert!(calls[2].starts_with("check ") && !calls[2].contains("--fix"));
    }

    #[test]
    fn test_debug_log_records_decision() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ruff.toml"), "").unwrap();
        let file = dir.path().join("app.py");
        fs::write(&file, "").unwrap();
        install_script(bin.path(), "ruff", "exit 0");

        hook(dir.path(), bin.path())
            .env("CLAUDE_HOOK_DEBUG", "1")
            .write_stdin(input(&file))
            .assert()
            .success();

        let log = fs::read_to_string(dir.path().join(".claude/logs/hook-debug.jsonl")).unwrap();
        assert!(log.contains("\"hook_name\":\"lint-on-save\""));
        assert!(log.contains("\"decision\":\"allow\""));
        assert!(log.contains("\"language\":\"python\""));
    }
}
