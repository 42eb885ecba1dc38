use std::path::Path;

use assert_cmd::Command;
use defg_core::AnyEmptyResult;
use defg_core::AnyResult;
use insta_cmd::get_cargo_bin;

pub fn defg_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("defg"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("DEFG_LOG");
	cmd
}

/// Write `content` to `relative` under `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> AnyEmptyResult {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)?;
	Ok(())
}

/// A project with two documented source files and no README.
pub fn sample_project() -> AnyResult<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	write_file(
		tmp.path(),
		"src/main.js",
		"//** # Project\n//** Intro line.\nconst x = 1;\n",
	)?;
	write_file(tmp.path(), "src/util.py", "##** ## Util\n##** Helper.\ndef util():\n    pass\n")?;
	Ok(tmp)
}
