mod common;

use clap::Parser;
use defg_cli::Commands;
use defg_cli::DefgCli;
use defg_cli::StrategyArg;
use defg_core::AnyEmptyResult;
use defg_core::Strategy;
use predicates::prelude::PredicateBooleanExt;
use similar_asserts::assert_eq;

#[test]
fn update_creates_readme_from_docblocks() -> AnyEmptyResult {
	let tmp = common::sample_project()?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("+ # Project"))
		.stdout(predicates::str::contains("Updated README.md"));

	let readme = std::fs::read_to_string(tmp.path().join("README.md"))?;
	assert_eq!(readme, "# Project\nIntro line.\n## Util\nHelper.\n");

	Ok(())
}

#[test]
fn update_preserves_hand_edits() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	common::write_file(
		tmp.path(),
		"README.md",
		"# Project\n![logo](logo.png)\nIntro line.\n\n<div class=\"insert-block\">\nCustom.\n</div>\n## \
		 Util\nOld helper.\n",
	)?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("~ ![logo](logo.png)"))
		.stdout(predicates::str::contains("- Old helper."))
		.stdout(predicates::str::contains("+ Helper."));

	let readme = std::fs::read_to_string(tmp.path().join("README.md"))?;
	assert_eq!(
		readme,
		"# Project\n![logo](logo.png)\nIntro line.\n\n<div class=\"insert-block\">\nCustom.\n</div>\n## \
		 Util\nHelper.\n"
	);

	Ok(())
}

#[test]
fn update_reorders_to_match_the_readme() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	let readme = "## Util\nHelper.\n\n# Project\nIntro line.\n";
	common::write_file(tmp.path(), "README.md", readme)?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("README.md"))?, readme);

	Ok(())
}

#[test]
fn update_leaves_readme_without_trailing_newline_alone() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "src/main.js", "//** # P\n//** text\n")?;
	common::write_file(tmp.path(), "README.md", "# P\ntext")?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"))
		.stdout(predicates::str::contains("Updated").not());

	assert_eq!(std::fs::read_to_string(tmp.path().join("README.md"))?, "# P\ntext");

	Ok(())
}

#[test]
fn update_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = common::sample_project()?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would update README.md"));

	assert!(!tmp.path().join("README.md").exists());

	Ok(())
}

#[test]
fn update_is_idempotent() -> AnyEmptyResult {
	let tmp = common::sample_project()?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update").arg("--path").arg(tmp.path()).assert().success();

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"))
		.stdout(predicates::str::contains("Updated").not());

	Ok(())
}

#[test]
fn update_fails_without_docblocks() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "src/main.js", "// just a comment\n")?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no documentation comments found"));

	Ok(())
}

#[test]
fn update_uses_readme_from_config() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	common::write_file(tmp.path(), "defg.toml", "readme = \"docs/INDEX.md\"\n")?;
	std::fs::create_dir_all(tmp.path().join("docs"))?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated docs/INDEX.md"));

	assert!(tmp.path().join("docs/INDEX.md").is_file());
	assert!(!tmp.path().join("README.md").exists());

	Ok(())
}

#[test]
fn update_readme_flag_overrides_config() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	common::write_file(tmp.path(), "defg.toml", "readme = \"docs/INDEX.md\"\n")?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.arg("--readme")
		.arg("OTHER.md")
		.assert()
		.success();

	let readme = std::fs::read_to_string(tmp.path().join("OTHER.md"))?;
	assert_eq!(readme, "# Project\nIntro line.\n## Util\nHelper.\n");

	Ok(())
}

#[test]
fn update_extension_flag_limits_sources() -> AnyEmptyResult {
	let tmp = common::sample_project()?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.arg("--ext")
		.arg("py")
		.assert()
		.success();

	let readme = std::fs::read_to_string(tmp.path().join("README.md"))?;
	assert_eq!(readme, "## Util\nHelper.\n");

	Ok(())
}

#[test]
fn update_reports_invalid_config() -> AnyEmptyResult {
	let tmp = common::sample_project()?;
	common::write_file(tmp.path(), "defg.toml", "strategy = \"fastest\"\n")?;

	let mut cmd = common::defg_cmd();
	cmd.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn strategy_flags_are_parsed() {
	let cli = DefgCli::parse_from(["defg", "update"]);
	assert_eq!(cli.requested_strategy(), None);
	match cli.command {
		Some(Commands::Update { dry_run }) => assert!(!dry_run),
		_ => panic!("expected Update command"),
	}

	let cli = DefgCli::parse_from(["defg", "update", "--quick"]);
	assert_eq!(cli.requested_strategy(), Some(Strategy::Quick));

	let cli = DefgCli::parse_from(["defg", "--strategy", "seeded", "update", "--dry-run"]);
	assert_eq!(cli.strategy, Some(StrategyArg::Seeded));
	assert_eq!(cli.requested_strategy(), Some(Strategy::Seeded));

	let result = DefgCli::try_parse_from(["defg", "update", "--quick", "--strategy", "exhaustive"]);
	assert!(result.is_err());
}
