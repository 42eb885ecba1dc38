use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DefgError {
	#[error(transparent)]
	#[diagnostic(code(defg::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(defg::config_parse),
		help("check that defg.toml is valid TOML, e.g. `readme = \"README.md\"`")
	)]
	ConfigParse(String),

	#[error("invalid pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(defg::invalid_pattern),
		help("`src` entries are globs and `skip` entries follow gitignore syntax")
	)]
	InvalidPattern { pattern: String, reason: String },

	#[error("a docblock must contain at least one line")]
	#[diagnostic(code(defg::empty_docblock))]
	EmptyDocblock,

	#[error("no documentation comments found under `{0}`")]
	#[diagnostic(
		code(defg::no_docblocks),
		help("write documentation lines as `//** text` or `##** text` in your source files")
	)]
	NoDocblocks(String),

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(defg::symlink_cycle),
		help("remove the circular symlink or add the path to `skip`")
	)]
	SymlinkCycle { path: String },

	#[error("`{0}` is out of date with the documentation comments")]
	#[diagnostic(
		code(defg::stale_readme),
		help("run `defg update` to merge the documentation comments")
	)]
	StaleReadme(String),
}

pub type DefgResult<T> = Result<T, DefgError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
