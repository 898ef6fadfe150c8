#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;

const ENV_YAML: &str = r#"
base:
  config:
    default: test
development:
  DATABASE: dev
production:
  DATABASE: prod
  PORT: 80
  config:
    allowed: [localhost, example.com]
"#;

fn envz_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("envz").unwrap();
	cmd.env_remove("NODE_ENV").env_remove("PORT").env_remove("RUST_LOG");
	cmd
}

fn project() -> tempfile::TempDir {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("env.yaml"), ENV_YAML).unwrap();
	temp_dir
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	envz_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Resolve environment-scoped YAML"));
}

#[test]
fn test_version_flag() {
	envz_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("envz"));
}

#[test]
fn test_no_args_shows_help() {
	envz_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// resolve tests
// ============================================================================

#[test]
fn test_resolve_defaults_to_development() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "--key", "env"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("development\n");
}

#[test]
fn test_resolve_respects_node_env() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "--key", "DATABASE"])
		.env("NODE_ENV", "production")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("prod\n");
}

#[test]
fn test_resolve_environment_flag() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "env.yaml", "-e", "production", "--key", "config.default"])
		.env("NODE_ENV", "development")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("test\n");
}

#[test]
fn test_resolve_env_var_overrides_file() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "-e", "production", "--format", "json"])
		.env("PORT", "9999999")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains(r#""PORT": "9999999""#));
}

#[test]
fn test_resolve_file_overrides_env_var() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "-e", "production", "--file-overrides", "--format", "json"])
		.env("PORT", "9999999")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains(r#""PORT": 80"#));
}

#[test]
fn test_resolve_override_flags_conflict() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "--file-overrides", "--env-overrides"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_resolve_pass_through_option() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "--set", "REGION=eu-west-1", "--key", "REGION"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("eu-west-1\n");
}

#[test]
fn test_resolve_sequence_value_renders_as_yaml() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "-e", "production", "--key", "config.allowed"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("- localhost"))
		.stdout(predicate::str::contains("- example.com"));
}

#[test]
fn test_resolve_missing_key() {
	let temp_dir = project();

	envz_cmd()
		.args(["resolve", "--key", "config.nope"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Key not found: config.nope"));
}

#[test]
fn test_resolve_missing_file() {
	let temp_dir = tempfile::tempdir().unwrap();

	envz_cmd()
		.args(["resolve", "nope.yaml"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Env yaml file does not exist"));
}

#[test]
fn test_resolve_invalid_yaml() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("env.yaml"), "development: [unclosed\n").unwrap();

	envz_cmd()
		.arg("resolve")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to parse env file"));
}

#[test]
fn test_resolve_toml_format() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join("env.yaml"),
		"development:\n  server:\n    port: 3000\n",
	)
	.unwrap();

	envz_cmd()
		.args(["resolve", "--format", "toml"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("[server]"))
		.stdout(predicate::str::contains("port = 3000"));
}

#[test]
fn test_resolve_toml_skips_null_values() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join("env.yaml"),
		"development:\n  KEY:\n  server:\n    port: 3000\n    host:\n",
	)
	.unwrap();

	envz_cmd()
		.args(["resolve", "--format", "toml"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("port = 3000"))
		.stdout(predicate::str::contains("KEY").not())
		.stdout(predicate::str::contains("host").not());
}

#[test]
fn test_resolve_toml_null_in_sequence_fails() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join("env.yaml"),
		"development:\n  hosts: [a, ~]\n",
	)
	.unwrap();

	envz_cmd()
		.args(["resolve", "--format", "toml"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("TOML has no null"));
}

// ============================================================================
// save tests
// ============================================================================

#[test]
fn test_save_then_resolve() {
	let temp_dir = project();

	envz_cmd()
		.args(["save", "env.yaml", "--set", "production.PORT=8080"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Saved env.yaml"));

	envz_cmd()
		.args(["resolve", "-e", "production", "--key", "PORT"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("8080\n");

	let content = fs::read_to_string(temp_dir.path().join("env.yaml")).unwrap();
	assert!(content.contains("DATABASE: prod"));
}

#[test]
fn test_save_with_data() {
	let temp_dir = project();

	envz_cmd()
		.args(["save", "--data", "staging: {DEBUG: true}"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	envz_cmd()
		.args(["resolve", "-e", "staging", "--key", "DEBUG"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("true\n");
}

#[test]
fn test_save_requires_update() {
	let temp_dir = project();

	envz_cmd()
		.arg("save")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("--set"));
}

#[test]
fn test_save_missing_file() {
	let temp_dir = tempfile::tempdir().unwrap();

	envz_cmd()
		.args(["save", "nope.yaml", "--set", "production.PORT=8080"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Env yaml file does not exist"));
}

#[test]
fn test_save_rejects_bad_assignment() {
	let temp_dir = project();

	envz_cmd()
		.args(["save", "--set", "production.PORT"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("expected KEY=VALUE"));
}

// ============================================================================
// environments tests
// ============================================================================

#[test]
fn test_environments_marks_active() {
	let temp_dir = project();

	envz_cmd()
		.args(["environments", "-e", "development"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("  base\n"))
		.stdout(predicate::str::contains("* development (active)"))
		.stdout(predicate::str::contains("  production (not merged)"));
}

#[test]
fn test_environments_undeclared_active() {
	let temp_dir = project();

	envz_cmd()
		.arg("environments")
		.env("NODE_ENV", "staging")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("'staging' is not declared"));
}

#[test]
fn test_environments_empty_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("env.yaml"), "").unwrap();

	envz_cmd()
		.arg("environments")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No environments declared"));
}

// ============================================================================
// init tests
// ============================================================================

#[test]
fn test_init_creates_env_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	let env_path = temp_dir.path().join("env.yaml");

	envz_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created env.yaml"));

	let content = fs::read_to_string(&env_path).unwrap();
	assert!(content.contains("base:"));
	assert!(content.contains("production:"));

	envz_cmd()
		.args(["resolve", "--key", "config.logLevel"])
		.env("NODE_ENV", "production")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("warn\n");
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("env.yaml"), "# existing").unwrap();

	envz_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	let env_path = temp_dir.path().join("env.yaml");
	fs::write(&env_path, "# existing").unwrap();

	envz_cmd()
		.args(["init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(&env_path).unwrap();
	assert!(content.contains("development:"));
}
