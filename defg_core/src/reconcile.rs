use tracing::debug;

use crate::DEFAULT_LOOKAHEAD;
use crate::Differ;
use crate::Docblock;
use crate::Operation;
use crate::OperationCounts;
use crate::OperationKind;
use crate::Search;
use crate::SearchStats;
use crate::Strategy;
use crate::merged_text;
use crate::normalize_document;
use crate::render_preview;

/// Tunables for [`reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
	pub strategy: Strategy,
	/// Lines the differ looks ahead on each side of a mismatch.
	pub lookahead: usize,
	/// Optional cap on differ invocations for the exhaustive search.
	pub max_steps: Option<usize>,
}

impl Default for ReconcileOptions {
	fn default() -> Self {
		Self {
			strategy: Strategy::default(),
			lookahead: DEFAULT_LOOKAHEAD,
			max_steps: None,
		}
	}
}

impl ReconcileOptions {
	pub fn with_strategy(strategy: Strategy) -> Self {
		Self {
			strategy,
			..Self::default()
		}
	}
}

/// The merged result of reconciling docblocks against a document.
#[derive(Debug, Clone)]
pub struct Reconciliation<'a> {
	/// Tagged lines of the best ordering, in output order.
	pub operations: Vec<Operation<'a>>,
	/// Total distance of the best ordering.
	pub distance: usize,
	/// Original docblock indices in the chosen order.
	pub order: Vec<usize>,
	/// `false` when a step budget or the quick strategy means a better
	/// ordering might exist.
	pub optimal: bool,
	pub stats: SearchStats,
}

impl Reconciliation<'_> {
	/// The merged document text. See [`merged_text`].
	pub fn merged_text(&self) -> String {
		merged_text(&self.operations)
	}

	pub fn counts(&self) -> OperationCounts {
		OperationCounts::from_operations(&self.operations)
	}

	/// True when applying the result would not add or remove any line.
	pub fn is_unchanged(&self) -> bool {
		self.counts().is_unchanged()
	}

	/// True when `document` already holds the merged content. A missing or
	/// extra final newline does not make a document stale.
	pub fn matches_document(&self, document: &str) -> bool {
		self.merged_text() == normalize_document(document)
	}

	/// Plain-text change preview. See [`render_preview`].
	pub fn preview(&self) -> String {
		render_preview(&self.operations)
	}
}

/// Find the ordering of `docblocks` that best matches `document` and return
/// its full alignment.
///
/// An empty document has nothing to match against: every docblock line is
/// emitted as [`OperationKind::Added`] in extraction order.
///
/// ```
/// use defg_core::Docblock;
/// use defg_core::OperationKind;
/// use defg_core::ReconcileOptions;
/// use defg_core::reconcile;
///
/// let docblocks = vec![Docblock::new(["B"])?, Docblock::new(["A"])?];
/// let result = reconcile(&docblocks, "A\nB\n", &ReconcileOptions::default());
///
/// assert_eq!(result.distance, 0);
/// assert_eq!(result.order, vec![1, 0]);
/// assert!(result.operations.iter().all(|op| op.kind == OperationKind::Unchanged));
/// # Ok::<(), defg_core::DefgError>(())
/// ```
pub fn reconcile<'a>(
	docblocks: &'a [Docblock],
	document: &'a str,
	options: &ReconcileOptions,
) -> Reconciliation<'a> {
	let document_lines: Vec<&'a str> = document.lines().collect();
	let blocks: Vec<Vec<&'a str>> = docblocks
		.iter()
		.map(|docblock| docblock.iter().map(String::as_str).collect())
		.collect();

	debug!(
		docblocks = blocks.len(),
		document_lines = document_lines.len(),
		strategy = ?options.strategy,
		"reconciling document"
	);

	if document_lines.is_empty() {
		return Reconciliation {
			operations: blocks
				.iter()
				.flat_map(|block| block.iter().copied())
				.map(|line| Operation::new(OperationKind::Added, line, 0))
				.collect(),
			distance: 0,
			order: (0..blocks.len()).collect(),
			optimal: true,
			stats: SearchStats::default(),
		};
	}

	let differ = Differ::new(&document_lines).with_lookahead(options.lookahead);
	let outcome = Search::new(differ, &blocks)
		.with_max_steps(options.max_steps)
		.run(options.strategy);

	Reconciliation {
		operations: outcome.best.operations,
		distance: outcome.best.distance,
		order: outcome.best.order,
		optimal: outcome.optimal,
		stats: outcome.stats,
	}
}
