use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DEFAULT_LOOKAHEAD;
use crate::DefgError;
use crate::DefgResult;
use crate::ReconcileOptions;
use crate::Strategy;

/// Default maximum source file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default document to reconcile, relative to the project root.
pub const DEFAULT_README: &str = "README.md";

/// Source file extensions scanned for documentation comments by default.
pub const DEFAULT_EXTENSIONS: [&str; 10] = [
	"js", "py", "java", "sql", "ts", "sh", "go", "c", "cpp", "rs",
];

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["defg.toml", ".defg.toml", ".config/defg.toml"];

/// Configuration loaded from a `defg.toml` file. Every key is optional and
/// command-line flags take precedence.
///
/// ```toml
/// readme = "docs/README.md"
/// src = ["src/**", "lib/**"]
/// skip = ["vendor/", "*.min.js"]
/// extensions = ["rs", "py"]
///
/// strategy = "seeded"
/// lookahead = 7
/// max_steps = 200000
///
/// max_file_size = 1048576
/// disable_gitignore = false
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DefgConfig {
	/// The document to reconcile, relative to the project root.
	#[serde(default = "default_readme")]
	pub readme: PathBuf,
	/// Glob patterns (relative to the root) restricting which source files are
	/// scanned. Empty means every file.
	#[serde(default)]
	pub src: Vec<String>,
	/// Gitignore-style patterns for files and directories to skip.
	#[serde(default)]
	pub skip: Vec<String>,
	/// Source file extensions to scan. Entries may be comma separated and may
	/// start with a dot. Empty means [`DEFAULT_EXTENSIONS`].
	#[serde(default)]
	pub extensions: Vec<String>,
	/// How docblock orderings are searched.
	#[serde(default)]
	pub strategy: Strategy,
	/// Lines the differ looks ahead on each side of a mismatch.
	#[serde(default = "default_lookahead")]
	pub lookahead: usize,
	/// Optional cap on differ invocations during the exhaustive search.
	#[serde(default)]
	pub max_steps: Option<usize>,
	/// Source files larger than this (in bytes) are skipped.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for DefgConfig {
	fn default() -> Self {
		Self {
			readme: default_readme(),
			src: Vec::new(),
			skip: Vec::new(),
			extensions: Vec::new(),
			strategy: Strategy::default(),
			lookahead: default_lookahead(),
			max_steps: None,
			max_file_size: default_max_file_size(),
			disable_gitignore: false,
		}
	}
}

fn default_readme() -> PathBuf {
	PathBuf::from(DEFAULT_README)
}

fn default_lookahead() -> usize {
	DEFAULT_LOOKAHEAD
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl DefgConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> DefgResult<Option<DefgConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Parse config from TOML text.
	pub fn parse(content: &str) -> DefgResult<DefgConfig> {
		toml::from_str(content).map_err(|e| DefgError::ConfigParse(e.to_string()))
	}

	/// Absolute path of the document to reconcile.
	pub fn readme_path(&self, root: &Path) -> PathBuf {
		root.join(&self.readme)
	}

	pub fn reconcile_options(&self) -> ReconcileOptions {
		ReconcileOptions {
			strategy: self.strategy,
			lookahead: self.lookahead,
			max_steps: self.max_steps,
		}
	}
}
