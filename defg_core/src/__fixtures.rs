use crate::Alignment;
use crate::Cursor;
use crate::Differ;
use crate::Docblock;
use crate::Operation;
use crate::OperationKind;
use crate::Pass;

/// Build docblocks from nested string slices. Every inner slice must be
/// non-empty.
pub fn docblocks(blocks: &[&[&str]]) -> Vec<Docblock> {
	blocks
		.iter()
		.map(|lines| Docblock::new(lines.iter().copied()).expect("fixture docblocks are non-empty"))
		.collect()
}

/// Lines of all operations with the given kind, in order.
pub fn lines_of<'a>(operations: &[Operation<'a>], kind: OperationKind) -> Vec<&'a str> {
	operations
		.iter()
		.filter(|operation| operation.kind == kind)
		.map(|operation| operation.line)
		.collect()
}

/// The document side of an alignment: every line that came from the document.
pub fn document_side<'a>(operations: &[Operation<'a>]) -> Vec<&'a str> {
	operations
		.iter()
		.filter(|operation| operation.kind != OperationKind::Added)
		.map(|operation| operation.line)
		.collect()
}

/// The non-blank docblock side of an alignment.
pub fn docblock_side<'a>(operations: &[Operation<'a>]) -> Vec<&'a str> {
	operations
		.iter()
		.filter(|operation| {
			matches!(
				operation.kind,
				OperationKind::Unchanged | OperationKind::Added
			)
		})
		.map(|operation| operation.line)
		.filter(|line| !line.trim().is_empty())
		.collect()
}

/// Concatenated non-blank lines of the docblocks in the given order.
pub fn ordered_lines<'a>(docblocks: &'a [Docblock], order: &[usize]) -> Vec<&'a str> {
	order
		.iter()
		.flat_map(|&index| docblocks[index].iter().map(String::as_str))
		.filter(|line| !line.trim().is_empty())
		.collect()
}

/// Every permutation of `0..count` in lexicographic order.
pub fn permutations(count: usize) -> Vec<Vec<usize>> {
	fn extend(prefix: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
		if prefix.len() == used.len() {
			out.push(prefix.clone());
			return;
		}
		for index in 0..used.len() {
			if used[index] {
				continue;
			}
			used[index] = true;
			prefix.push(index);
			extend(prefix, used, out);
			prefix.pop();
			used[index] = false;
		}
	}

	let mut out = Vec::new();
	extend(&mut Vec::new(), &mut vec![false; count], &mut out);
	out
}

/// Score one ordering the same way the search does (one differ call per
/// docblock, resuming from the previous cursor) but without any bound.
pub fn score_order(document: &[&str], docblocks: &[Docblock], order: &[usize]) -> usize {
	let differ = Differ::new(document);
	let mut data: Vec<&str> = Vec::new();
	let mut cursor = Cursor::default();
	let mut operations = Vec::new();

	for (position, &index) in order.iter().enumerate() {
		data.extend(docblocks[index].iter().map(String::as_str));
		let pass = if position + 1 < order.len() {
			Pass::Partial
		} else {
			Pass::Final
		};
		match differ.align(&data, cursor, pass, None, &mut operations) {
			Alignment::Aligned(next) => cursor = next,
			Alignment::Pruned => panic!("unbounded alignments are never pruned"),
		}
	}

	cursor.distance
}

/// Brute force over all orderings: the minimal distance and the
/// lexicographically first ordering achieving it.
pub fn brute_force(document: &str, docblocks: &[Docblock]) -> (usize, Vec<usize>) {
	let lines: Vec<&str> = document.lines().collect();
	permutations(docblocks.len())
		.into_iter()
		.map(|order| (score_order(&lines, docblocks, &order), order))
		.min()
		.expect("at least one ordering")
}
