//! Incremental line-wise alignment of candidate docblock lines against the
//! document.
//!
//! The differ walks both sequences with two pointers. Equal lines are kept,
//! mismatches are resolved with a bounded lookahead on either side, and
//! everything the author added by hand (blank lines, images, lone HTML tags,
//! insert-block regions) passes through as [`OperationKind::Fresh`].
//!
//! A walk can stop once the candidate data is consumed ([`Pass::Partial`])
//! and resume later from the returned [`Cursor`] after more data has been
//! appended. The permutation search depends on this to avoid re-aligning
//! shared prefixes.

use crate::Operation;
use crate::OperationKind;
use crate::classify::is_blank;
use crate::classify::is_insert_block_close;
use crate::classify::is_insert_block_open;
use crate::classify::is_self_contained_insert_block;
use crate::classify::is_special_line;

/// Default number of lines the differ looks ahead on each side when the
/// current lines do not match.
pub const DEFAULT_LOOKAHEAD: usize = 7;

/// Resumption point of an alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
	/// Next unread index into the candidate data.
	pub data: usize,
	/// Next unread index into the document.
	pub doc: usize,
	/// Distance charged so far.
	pub distance: usize,
	/// Whether the walk is inside an insert-block region of the document.
	pub in_insert_block: bool,
}

/// Whether more data will be appended after this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
	/// Stop when the data runs out. Remaining document lines are left for a
	/// later call.
	Partial,
	/// The data is complete. Remaining document lines are drained.
	Final,
}

/// Outcome of [`Differ::align`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
	Aligned(Cursor),
	/// The running distance exceeded the bound; the walk was abandoned.
	Pruned,
}

/// Aligns candidate data against a fixed document.
#[derive(Debug, Clone, Copy)]
pub struct Differ<'d, 'a> {
	document: &'d [&'a str],
	lookahead: usize,
}

impl<'d, 'a> Differ<'d, 'a> {
	pub fn new(document: &'d [&'a str]) -> Self {
		Self {
			document,
			lookahead: DEFAULT_LOOKAHEAD,
		}
	}

	#[must_use]
	pub fn with_lookahead(mut self, lookahead: usize) -> Self {
		self.lookahead = lookahead;
		self
	}

	/// Continue aligning `data` against the document from `start`, appending
	/// the produced operations to `out`.
	///
	/// When `bound` is set and the running distance exceeds it,
	/// [`Alignment::Pruned`] is returned immediately and `out` holds a
	/// partial, meaningless tail that the caller must discard.
	pub fn align(
		&self,
		data: &[&'a str],
		start: Cursor,
		pass: Pass,
		bound: Option<usize>,
		out: &mut Vec<Operation<'a>>,
	) -> Alignment {
		let walk = Walk {
			data,
			document: self.document,
			lookahead: self.lookahead,
			bound,
			cursor: start,
			out,
		};

		match walk.run(pass) {
			Ok(cursor) => Alignment::Aligned(cursor),
			Err(Exceeded) => Alignment::Pruned,
		}
	}

	/// Align the complete `data` against the whole document in one unbounded
	/// pass.
	pub fn diff(&self, data: &[&'a str]) -> (usize, Vec<Operation<'a>>) {
		let mut operations = Vec::new();
		match self.align(data, Cursor::default(), Pass::Final, None, &mut operations) {
			Alignment::Aligned(cursor) => (cursor.distance, operations),
			Alignment::Pruned => unreachable!("an unbounded alignment is never pruned"),
		}
	}
}

/// The bound was exceeded.
struct Exceeded;

struct Walk<'w, 'a> {
	data: &'w [&'a str],
	document: &'w [&'a str],
	lookahead: usize,
	bound: Option<usize>,
	cursor: Cursor,
	out: &'w mut Vec<Operation<'a>>,
}

impl<'a> Walk<'_, 'a> {
	fn run(mut self, pass: Pass) -> Result<Cursor, Exceeded> {
		while self.cursor.data < self.data.len() && self.cursor.doc < self.document.len() {
			if self.consume_opaque() {
				continue;
			}

			let data_line = self.data[self.cursor.data];
			let doc_line = self.document[self.cursor.doc];

			if data_line == doc_line {
				self.emit(OperationKind::Unchanged, doc_line);
				self.cursor.data += 1;
				self.cursor.doc += 1;
			} else if is_blank(data_line) {
				self.cursor.data += 1;
			} else if is_preserved(doc_line) {
				self.emit(OperationKind::Fresh, doc_line);
				self.cursor.doc += 1;
			} else {
				self.resolve_mismatch(data_line, doc_line)?;
			}
		}

		// The document ran out, so whatever data is left is new content.
		while self.cursor.data < self.data.len() {
			self.add_data_line()?;
		}

		if pass == Pass::Final {
			while self.cursor.doc < self.document.len() {
				if !self.consume_opaque() {
					self.drop_doc_line()?;
				}
			}
		}

		Ok(self.cursor)
	}

	/// Consume the document line when it belongs to an insert-block region.
	fn consume_opaque(&mut self) -> bool {
		let line = self.document[self.cursor.doc];

		if self.cursor.in_insert_block {
			if is_insert_block_close(line) {
				self.cursor.in_insert_block = false;
			}
		} else if is_insert_block_open(line) {
			self.cursor.in_insert_block = !is_self_contained_insert_block(line);
		} else {
			return false;
		}

		self.emit(OperationKind::Fresh, line);
		self.cursor.doc += 1;
		true
	}

	fn resolve_mismatch(&mut self, data_line: &'a str, doc_line: &'a str) -> Result<(), Exceeded> {
		if let Some(offset) = self.find_in_document(data_line) {
			for _ in 0..offset {
				self.drop_doc_line()?;
			}
			return Ok(());
		}

		if let Some(offset) = self.find_in_data(doc_line) {
			for _ in 0..offset {
				self.add_data_line()?;
			}
			return Ok(());
		}

		self.charge(OperationKind::Removed, doc_line)?;
		self.cursor.doc += 1;
		self.charge(OperationKind::Added, data_line)?;
		self.cursor.data += 1;
		Ok(())
	}

	/// Offset of the next document line equal to `line` within the lookahead
	/// window. Never looks past the start of an insert-block.
	fn find_in_document(&self, line: &str) -> Option<usize> {
		(1..=self.lookahead)
			.map_while(|offset| {
				self.document
					.get(self.cursor.doc + offset)
					.map(|candidate| (offset, *candidate))
			})
			.take_while(|(_, candidate)| !is_insert_block_open(candidate))
			.find(|(_, candidate)| *candidate == line)
			.map(|(offset, _)| offset)
	}

	/// Offset of the next data line equal to `line` within the lookahead
	/// window.
	fn find_in_data(&self, line: &str) -> Option<usize> {
		(1..=self.lookahead)
			.map_while(|offset| {
				self.data
					.get(self.cursor.data + offset)
					.map(|candidate| (offset, *candidate))
			})
			.find(|(_, candidate)| *candidate == line)
			.map(|(offset, _)| offset)
	}

	/// Emit the current document line as removed, unless it is hand-added
	/// formatting which is always kept.
	fn drop_doc_line(&mut self) -> Result<(), Exceeded> {
		let line = self.document[self.cursor.doc];
		if is_preserved(line) {
			self.emit(OperationKind::Fresh, line);
		} else {
			self.charge(OperationKind::Removed, line)?;
		}
		self.cursor.doc += 1;
		Ok(())
	}

	/// Emit the current data line as added. Blank lines cost nothing.
	fn add_data_line(&mut self) -> Result<(), Exceeded> {
		let line = self.data[self.cursor.data];
		if is_blank(line) {
			self.emit(OperationKind::Added, line);
		} else {
			self.charge(OperationKind::Added, line)?;
		}
		self.cursor.data += 1;
		Ok(())
	}

	fn emit(&mut self, kind: OperationKind, line: &'a str) {
		self.out
			.push(Operation::new(kind, line, self.cursor.distance));
	}

	/// Record a costed operation and enforce the bound. Distance never
	/// decreases, so once the bound is exceeded no continuation can recover.
	fn charge(&mut self, kind: OperationKind, line: &'a str) -> Result<(), Exceeded> {
		self.cursor.distance += 1;
		self.emit(kind, line);

		match self.bound {
			Some(bound) if self.cursor.distance > bound => Err(Exceeded),
			_ => Ok(()),
		}
	}
}

/// Blank and special document lines are never charged.
fn is_preserved(line: &str) -> bool {
	is_blank(line) || is_special_line(line)
}
