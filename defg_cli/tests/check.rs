mod common;

use clap::Parser;
use defg_cli::Commands;
use defg_cli::DefgCli;
use defg_cli::OutputFormat;
use defg_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn check_passes_after_update() -> AnyEmptyResult {
	let tmp = common::sample_project()?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update").arg("--path").arg(tmp.path()).assert().success();

	let mut cmd = common::defg_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed: README.md is up to date."));

	Ok(())
}

#[test]
fn check_passes_without_trailing_newline() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "src/main.js", "//** # P\n//** text\n")?;
	common::write_file(tmp.path(), "README.md", "# P\ntext")?;

	let mut cmd = common::defg_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed: README.md is up to date."));

	Ok(())
}

#[test]
fn check_fails_when_stale() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	common::write_file(tmp.path(), "README.md", "# Project\nOld intro.\n")?;

	let mut cmd = common::defg_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("out of date"))
		.stderr(predicates::str::contains("defg update"))
		.stderr(predicates::str::contains("-Old intro.").not());

	// Check must never write.
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("README.md"))?,
		"# Project\nOld intro.\n"
	);

	Ok(())
}

#[test]
fn check_fails_when_readme_is_missing() -> AnyEmptyResult {
	let tmp = common::sample_project()?;

	let mut cmd = common::defg_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1);

	Ok(())
}

#[test]
fn check_diff_shows_changed_lines() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	common::write_file(tmp.path(), "README.md", "# Project\nOld intro.\n")?;

	let mut cmd = common::defg_cmd();
	cmd.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-Old intro."))
		.stderr(predicates::str::contains("+Intro line."))
		.stderr(predicates::str::contains("+## Util"));

	Ok(())
}

#[test]
fn check_json_reports_counts() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	common::write_file(tmp.path(), "README.md", "# Project\nOld intro.\n")?;

	let mut cmd = common::defg_cmd();
	let output = cmd
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["readme"], "README.md");
	assert_eq!(json["order"], serde_json::json!([0, 1]));
	assert_eq!(json["counts"]["unchanged"], 1);
	assert_eq!(json["counts"]["removed"], 1);
	assert_eq!(json["counts"]["added"], 3);

	Ok(())
}

#[test]
fn check_json_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	common::write_file(
		tmp.path(),
		"README.md",
		"# Project\nIntro line.\n## Util\nHelper.\n",
	)?;

	let mut cmd = common::defg_cmd();
	let output = cmd
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(true));
	assert_eq!(json["distance"], 0);
	assert_eq!(json["optimal"], Value::Bool(true));

	Ok(())
}

#[test]
fn check_format_defaults_to_text() {
	let cli = DefgCli::parse_from(["defg", "check"]);
	match cli.command {
		Some(Commands::Check { diff, format }) => {
			assert!(!diff);
			assert!(matches!(format, OutputFormat::Text));
		}
		_ => panic!("expected Check command"),
	}

	let cli = DefgCli::parse_from(["defg", "check", "--diff", "--format", "json"]);
	match cli.command {
		Some(Commands::Check { diff, format }) => {
			assert!(diff);
			assert!(matches!(format, OutputFormat::Json));
		}
		_ => panic!("expected Check command"),
	}
}
