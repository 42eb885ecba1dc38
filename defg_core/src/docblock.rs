use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;

use crate::DefgError;
use crate::DefgResult;

/// Where a docblock was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
	pub file: PathBuf,
	/// 1-indexed line of the first documentation line.
	pub line: usize,
}

/// A non-empty run of documentation lines extracted as one unit. Docblocks are
/// the atoms the permutation search reorders; their content is never split.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Docblock {
	#[deref]
	lines: Vec<String>,
	origin: Option<Origin>,
}

impl Docblock {
	/// Create a docblock from its lines. Fails when `lines` is empty.
	pub fn new<I, S>(lines: I) -> DefgResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
		if lines.is_empty() {
			return Err(DefgError::EmptyDocblock);
		}

		Ok(Self {
			lines,
			origin: None,
		})
	}

	/// `lines` must not be empty.
	pub(crate) fn from_parts(lines: Vec<String>, origin: Option<Origin>) -> Self {
		debug_assert!(!lines.is_empty(), "docblocks are never empty");
		Self { lines, origin }
	}

	#[must_use]
	pub fn with_origin(mut self, file: impl AsRef<Path>, line: usize) -> Self {
		self.origin = Some(Origin {
			file: file.as_ref().to_path_buf(),
			line,
		});
		self
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	pub fn origin(&self) -> Option<&Origin> {
		self.origin.as_ref()
	}
}
