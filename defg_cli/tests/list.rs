mod common;

use defg_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn list_shows_every_docblock_with_its_origin() -> AnyEmptyResult {
	let tmp = common::sample_project()?;

	let mut cmd = common::defg_cmd();
	cmd.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("[0] src/main.js:1 # Project (2 line(s))"))
		.stdout(predicates::str::contains("[1] src/util.py:1 ## Util (2 line(s))"))
		.stdout(predicates::str::contains("2 docblock(s)"));

	Ok(())
}

#[test]
fn list_respects_skip_patterns() -> AnyEmptyResult {
	let tmp = common::sample_project()?;

	let mut cmd = common::defg_cmd();
	cmd.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.arg("--skip")
		.arg("*.py")
		.assert()
		.success()
		.stdout(predicates::str::contains("src/util.py").not())
		.stdout(predicates::str::contains("1 docblock(s)"));

	Ok(())
}
