use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use tracing::debug;
use tracing::warn;

use crate::DefgError;
use crate::DefgResult;
use crate::Docblock;
use crate::config::DEFAULT_EXTENSIONS;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::DefgConfig;
use crate::source_scanner::extract_docblocks;

/// Options for controlling which source files are scanned for docblocks.
///
/// Use [`ScanOptions::default()`] for sensible defaults or
/// [`ScanOptions::from_config`] to construct from a [`DefgConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Glob patterns (relative to the root) a file must match. Empty matches
	/// everything.
	pub src: Vec<String>,
	/// Gitignore-style patterns to skip.
	pub skip: Vec<String>,
	/// Accepted file extensions, without the leading dot.
	pub extensions: Vec<String>,
	/// Maximum file size to scan in bytes.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			src: Vec::new(),
			skip: Vec::new(),
			extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from an optional [`DefgConfig`].
	pub fn from_config(config: Option<&DefgConfig>) -> Self {
		let Some(config) = config else {
			return Self::default();
		};

		let mut options = Self {
			src: config.src.clone(),
			skip: config.skip.clone(),
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
			..Self::default()
		};
		if !config.extensions.is_empty() {
			options.extensions = normalize_extensions(&config.extensions);
		}

		options
	}
}

/// Flatten extension lists such as `["js,ts", ".py"]` into `["js", "ts",
/// "py"]`.
pub fn normalize_extensions<S: AsRef<str>>(values: &[S]) -> Vec<String> {
	values
		.iter()
		.flat_map(|value| value.as_ref().split(','))
		.map(|extension| extension.trim().trim_start_matches('.'))
		.filter(|extension| !extension.is_empty())
		.map(ToString::to_string)
		.collect()
}

/// Extract every docblock from the source files under `root`, in sorted path
/// order and in file order within each path.
pub fn scan_docblocks(root: &Path, options: &ScanOptions) -> DefgResult<Vec<Docblock>> {
	let files = collect_source_files(root, options)?;
	let mut docblocks = Vec::new();

	for file in files {
		let size = std::fs::metadata(&file)?.len();
		if size > options.max_file_size {
			warn!(
				path = %file.display(),
				size,
				limit = options.max_file_size,
				"skipping file larger than the size limit"
			);
			continue;
		}

		let content = match std::fs::read_to_string(&file) {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
				debug!(path = %file.display(), "skipping file that is not valid UTF-8");
				continue;
			}
			Err(e) => return Err(e.into()),
		};

		let found = extract_docblocks(&content, Some(&file));
		if !found.is_empty() {
			debug!(path = %file.display(), count = found.len(), "extracted docblocks");
		}
		docblocks.extend(found);
	}

	Ok(docblocks)
}

/// Collect the source files under `root` that pass the gitignore, skip, src
/// and extension filters, sorted for deterministic ordering.
pub fn collect_source_files(root: &Path, options: &ScanOptions) -> DefgResult<Vec<PathBuf>> {
	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let filter = FileFilter {
		root,
		gitignore,
		skip: build_skip_matcher(root, &options.skip)?,
		src: build_glob_set(&options.src)?,
		extensions: &options.extensions,
	};

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk_dir(root, &filter, &mut files, &mut visited_dirs)?;
	files.sort();

	Ok(files)
}

struct FileFilter<'o> {
	root: &'o Path,
	gitignore: Gitignore,
	skip: Gitignore,
	src: Option<GlobSet>,
	extensions: &'o [String],
}

impl FileFilter<'_> {
	fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
		self.gitignore.matched(path, is_dir).is_ignore() || self.skip.matched(path, is_dir).is_ignore()
	}

	fn accepts_file(&self, path: &Path) -> bool {
		let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
			return false;
		};
		let has_extension = self
			.extensions
			.iter()
			.any(|extension| name.ends_with(&format!(".{extension}")));
		if !has_extension {
			return false;
		}

		let Some(src) = &self.src else {
			return true;
		};
		path.strip_prefix(self.root)
			.is_ok_and(|relative| src.is_match(relative))
	}
}

/// Build a `GlobSet` from the `src` patterns, or `None` when every file is
/// accepted.
fn build_glob_set(patterns: &[String]) -> DefgResult<Option<GlobSet>> {
	if patterns.is_empty() {
		return Ok(None);
	}

	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			DefgError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map(Some).map_err(|e| {
		DefgError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the `skip` patterns. These follow
/// `.gitignore` syntax and are applied on top of any `.gitignore` rules.
fn build_skip_matcher(root: &Path, patterns: &[String]) -> DefgResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			DefgError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}

	builder.build().map_err(|e| {
		DefgError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		if let Some(e) = builder.add(&gitignore_path) {
			warn!(path = %gitignore_path.display(), error = %e, "failed to read .gitignore");
		}
	}

	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	dir: &Path,
	filter: &FileFilter<'_>,
	files: &mut Vec<PathBuf>,
	visited_dirs: &mut HashSet<PathBuf>,
) -> DefgResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Detect symlink cycles by tracking canonical paths.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(DefgError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let is_dir = path.is_dir();

		if is_dir
			&& path
				.file_name()
				.and_then(|name| name.to_str())
				.is_some_and(is_ignored_directory_name)
		{
			continue;
		}

		if filter.is_ignored(&path, is_dir) {
			continue;
		}

		if is_dir {
			walk_dir(&path, filter, files, visited_dirs)?;
		} else if filter.accepts_file(&path) {
			files.push(path);
		}
	}

	Ok(())
}
