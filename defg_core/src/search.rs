//! Permutation search over docblock orderings.
//!
//! The exhaustive strategy is a depth-first branch-and-bound over all `m!`
//! orderings driven by an explicit stack. Every frame stores the differ
//! [`Cursor`] reached by its prefix, so extending a prefix with one more
//! docblock only aligns the newly appended lines. A branch is abandoned as
//! soon as its partial distance exceeds the best complete ordering found so
//! far.

use serde::Deserialize;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::Alignment;
use crate::Cursor;
use crate::Differ;
use crate::Operation;
use crate::Pass;

/// How docblock orderings are explored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
	/// Branch-and-bound over every ordering. Finds the minimal distance.
	#[default]
	Exhaustive,
	/// Single greedy pass: each slot takes the docblock that adds the least
	/// distance. Needs `O(m²)` alignments but may miss the optimum.
	Quick,
	/// Greedy pass first, then an exhaustive search bounded by its result.
	Seeded,
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
	/// Number of differ invocations.
	pub alignments: usize,
	/// Branches abandoned because they exceeded the best distance.
	pub pruned: usize,
	/// Complete orderings that reached the end of the document.
	pub completed: usize,
}

/// A complete ordering and its alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
	pub distance: usize,
	/// Original indices of the docblocks, in the chosen order.
	pub order: Vec<usize>,
	pub operations: Vec<Operation<'a>>,
}

impl Candidate<'_> {
	/// Whether an ordering with `distance` replaces this one. Lower distance
	/// wins; equal distances go to the lexicographically smaller index
	/// sequence so the result never depends on traversal order.
	fn is_beaten_by(&self, distance: usize, order: &[usize]) -> bool {
		distance < self.distance || (distance == self.distance && order < self.order.as_slice())
	}
}

/// Result of [`Search::run`].
#[derive(Debug, Clone)]
pub struct SearchOutcome<'a> {
	pub best: Candidate<'a>,
	/// `true` when `best` is known to have the minimal distance.
	pub optimal: bool,
	pub stats: SearchStats,
}

/// One level of the exhaustive search: the state reached by the current
/// prefix and the next docblock index to try after it.
#[derive(Debug, Clone, Copy)]
struct Frame {
	cursor: Cursor,
	data_len: usize,
	operations_len: usize,
	next: usize,
}

/// Searches for the ordering of `docblocks` that best matches the document
/// held by the differ. Holds the single best-so-far record shared by every
/// branch.
pub struct Search<'d, 'a> {
	differ: Differ<'d, 'a>,
	docblocks: &'d [Vec<&'a str>],
	max_steps: Option<usize>,
	best: Option<Candidate<'a>>,
	stats: SearchStats,
}

impl<'d, 'a> Search<'d, 'a> {
	pub fn new(differ: Differ<'d, 'a>, docblocks: &'d [Vec<&'a str>]) -> Self {
		Self {
			differ,
			docblocks,
			max_steps: None,
			best: None,
			stats: SearchStats::default(),
		}
	}

	/// Stop exploring after this many differ invocations. The best ordering
	/// found until then is returned and marked as not optimal.
	#[must_use]
	pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
		self.max_steps = max_steps;
		self
	}

	pub fn run(mut self, strategy: Strategy) -> SearchOutcome<'a> {
		if self.docblocks.is_empty() {
			let (distance, operations) = self.differ.diff(&[]);
			self.stats.alignments += 1;
			self.stats.completed += 1;
			return SearchOutcome {
				best: Candidate {
					distance,
					order: Vec::new(),
					operations,
				},
				optimal: true,
				stats: self.stats,
			};
		}

		let optimal = match strategy {
			Strategy::Exhaustive => self.exhaustive(),
			Strategy::Quick => {
				let greedy = self.greedy();
				let optimal = greedy.distance == 0;
				self.best = Some(greedy);
				optimal
			}
			Strategy::Seeded => {
				let greedy = self.greedy();
				debug!(distance = greedy.distance, "seeding exhaustive search");
				self.offer(greedy.distance, &greedy.order, &greedy.operations);
				self.exhaustive()
			}
		};

		let best = match self.best.take() {
			Some(best) => best,
			None => {
				warn!("step budget exhausted before any complete ordering, using greedy result");
				self.greedy()
			}
		};

		debug!(
			distance = best.distance,
			order = ?best.order,
			optimal,
			alignments = self.stats.alignments,
			pruned = self.stats.pruned,
			"search finished"
		);

		SearchOutcome {
			best,
			optimal,
			stats: self.stats,
		}
	}

	/// Run the branch-and-bound search. Returns `false` when the step budget
	/// ran out before the search space was covered.
	fn exhaustive(&mut self) -> bool {
		let count = self.docblocks.len();
		let mut used = vec![false; count];
		let mut order: Vec<usize> = Vec::with_capacity(count);
		let mut data: Vec<&'a str> = Vec::new();
		let mut operations: Vec<Operation<'a>> = Vec::new();
		let mut stack = vec![Frame {
			cursor: Cursor::default(),
			data_len: 0,
			operations_len: 0,
			next: 0,
		}];

		while let Some(frame) = stack.last_mut() {
			if self.best.as_ref().is_some_and(|best| best.distance == 0) {
				debug!("found a zero distance ordering");
				return true;
			}

			let Some(index) = (frame.next..count).find(|&index| !used[index]) else {
				stack.pop();
				if let Some(index) = order.pop() {
					used[index] = false;
				}
				continue;
			};
			frame.next = index + 1;
			let parent = *frame;

			if self.budget_exhausted() {
				warn!(
					max_steps = ?self.max_steps,
					"step budget exhausted, returning best ordering so far"
				);
				return false;
			}

			data.truncate(parent.data_len);
			operations.truncate(parent.operations_len);
			data.extend_from_slice(&self.docblocks[index]);

			let pass = if order.len() + 1 < count {
				Pass::Partial
			} else {
				Pass::Final
			};
			let bound = self.best.as_ref().map(|best| best.distance);

			match self.align(&data, parent.cursor, pass, bound, &mut operations) {
				Alignment::Pruned => {
					self.stats.pruned += 1;
					trace!(depth = order.len(), index, ?bound, "pruned branch");
				}
				Alignment::Aligned(cursor) if pass == Pass::Final => {
					order.push(index);
					self.offer(cursor.distance, &order, &operations);
					order.pop();
				}
				Alignment::Aligned(cursor) => {
					used[index] = true;
					order.push(index);
					stack.push(Frame {
						cursor,
						data_len: data.len(),
						operations_len: operations.len(),
						next: 0,
					});
				}
			}
		}

		true
	}

	/// Build an ordering slot by slot, each time committing to the unused
	/// docblock whose alignment adds the least distance. Ties go to the lower
	/// index.
	fn greedy(&mut self) -> Candidate<'a> {
		let count = self.docblocks.len();
		let mut used = vec![false; count];
		let mut order: Vec<usize> = Vec::with_capacity(count);
		let mut data: Vec<&'a str> = Vec::new();
		let mut operations: Vec<Operation<'a>> = Vec::new();
		let mut cursor = Cursor::default();

		while order.len() < count {
			let pass = if order.len() + 1 < count {
				Pass::Partial
			} else {
				Pass::Final
			};
			let mut chosen: Option<(usize, Cursor, Vec<Operation<'a>>)> = None;

			for index in 0..count {
				if used[index] {
					continue;
				}

				let data_len = data.len();
				data.extend_from_slice(&self.docblocks[index]);
				let bound = chosen.as_ref().map(|(_, best, _)| best.distance);
				let mut scratch = Vec::new();
				let alignment = self.align(&data, cursor, pass, bound, &mut scratch);
				data.truncate(data_len);

				let Alignment::Aligned(next) = alignment else {
					continue;
				};
				if chosen
					.as_ref()
					.is_none_or(|(_, best, _)| next.distance < best.distance)
				{
					chosen = Some((index, next, scratch));
				}
			}

			let Some((index, next, scratch)) = chosen else {
				break;
			};

			trace!(
				slot = order.len(),
				index,
				added = next.distance - cursor.distance,
				"greedy pick"
			);
			used[index] = true;
			order.push(index);
			data.extend_from_slice(&self.docblocks[index]);
			operations.extend(scratch);
			cursor = next;
		}

		Candidate {
			distance: cursor.distance,
			order,
			operations,
		}
	}

	fn align(
		&mut self,
		data: &[&'a str],
		start: Cursor,
		pass: Pass,
		bound: Option<usize>,
		out: &mut Vec<Operation<'a>>,
	) -> Alignment {
		self.stats.alignments += 1;
		self.differ.align(data, start, pass, bound, out)
	}

	/// Offer a complete ordering to the best-so-far record.
	fn offer(&mut self, distance: usize, order: &[usize], operations: &[Operation<'a>]) {
		self.stats.completed += 1;

		if self
			.best
			.as_ref()
			.is_some_and(|best| !best.is_beaten_by(distance, order))
		{
			return;
		}

		debug!(distance, ?order, "new best ordering");
		self.best = Some(Candidate {
			distance,
			order: order.to_vec(),
			operations: operations.to_vec(),
		});
	}

	fn budget_exhausted(&self) -> bool {
		self.max_steps
			.is_some_and(|max_steps| self.stats.alignments >= max_steps)
	}
}
