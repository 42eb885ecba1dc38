use std::fmt;

/// How a single line ends up in the merged document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Present in both the docblocks and the document.
	Unchanged,
	/// New content from the docblocks that the document does not have yet.
	Added,
	/// Document content that no longer appears in the chosen docblock order.
	Removed,
	/// Hand-added formatting (special lines, blank lines, insert-blocks) that
	/// is always kept.
	Fresh,
}

impl OperationKind {
	/// Two-character marker used by the plain-text preview.
	pub fn marker(self) -> &'static str {
		match self {
			Self::Unchanged => "  ",
			Self::Added => "+ ",
			Self::Removed => "- ",
			Self::Fresh => "~ ",
		}
	}
}

/// A tagged line produced by the differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation<'a> {
	pub kind: OperationKind,
	pub line: &'a str,
	/// Cumulative distance at the point this operation was produced. Only
	/// useful for diagnostics.
	pub distance: usize,
}

impl<'a> Operation<'a> {
	pub fn new(kind: OperationKind, line: &'a str, distance: usize) -> Self {
		Self {
			kind,
			line,
			distance,
		}
	}

	/// Every operation except [`OperationKind::Removed`] contributes its line
	/// to the merged document.
	pub fn is_kept(&self) -> bool {
		self.kind != OperationKind::Removed
	}
}

impl fmt::Display for Operation<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.kind.marker(), self.line)
	}
}

/// Number of operations of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
	pub unchanged: usize,
	pub added: usize,
	pub removed: usize,
	pub fresh: usize,
}

impl OperationCounts {
	pub fn from_operations(operations: &[Operation<'_>]) -> Self {
		let mut counts = Self::default();
		for operation in operations {
			match operation.kind {
				OperationKind::Unchanged => counts.unchanged += 1,
				OperationKind::Added => counts.added += 1,
				OperationKind::Removed => counts.removed += 1,
				OperationKind::Fresh => counts.fresh += 1,
			}
		}
		counts
	}

	/// Returns true when nothing was added or removed.
	pub fn is_unchanged(&self) -> bool {
		self.added == 0 && self.removed == 0
	}
}

/// Build the merged document from a sequence of operations: the lines of all
/// kept operations joined by `\n`, with leading and trailing blank lines
/// trimmed.
pub fn merged_text(operations: &[Operation<'_>]) -> String {
	let lines: Vec<&str> = operations
		.iter()
		.filter(|operation| operation.is_kept())
		.map(|operation| operation.line)
		.collect();

	join_trimmed(&lines)
}

/// Normalize document text the same way [`merged_text`] shapes its output,
/// so the two can be compared for equality. Line endings and surrounding
/// blank lines are not significant.
pub fn normalize_document(document: &str) -> String {
	let lines: Vec<&str> = document.lines().collect();
	join_trimmed(&lines)
}

fn join_trimmed(lines: &[&str]) -> String {
	let start = lines
		.iter()
		.position(|line| !line.trim().is_empty())
		.unwrap_or(lines.len());
	let end = lines
		.iter()
		.rposition(|line| !line.trim().is_empty())
		.map_or(start, |index| index + 1);

	lines[start..end].join("\n")
}

/// Render every operation on its own line using the plain-text markers.
pub fn render_preview(operations: &[Operation<'_>]) -> String {
	operations
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("\n")
}
