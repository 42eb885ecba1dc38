use std::path::Path;

use crate::Docblock;
use crate::Origin;

/// Length of a documentation marker such as `//**` or `##**`.
const MARKER_LEN: usize = 4;

/// Extract the documentation text from a single source line.
///
/// A documentation line contains a marker made of two comment characters
/// (`/` or `#`, in any combination) followed by `**`. The first marker on the
/// line decides:
///
/// - marker at end of line, or followed by one space → empty documentation
///   line
/// - marker followed by a space → the text after that space
/// - anything else → not a documentation line
///
/// ```
/// use defg_core::source_scanner::extract_doc_line;
///
/// assert_eq!(extract_doc_line("//** # Title"), Some("# Title"));
/// assert_eq!(extract_doc_line("    ##** indented"), Some("indented"));
/// assert_eq!(extract_doc_line("//**"), Some(""));
/// assert_eq!(extract_doc_line("/** jsdoc */"), None);
/// ```
pub fn extract_doc_line(line: &str) -> Option<&str> {
	let marker = line.as_bytes().windows(MARKER_LEN).position(|window| {
		matches!(window[0], b'/' | b'#') && matches!(window[1], b'/' | b'#') && &window[2..] == b"**"
	})?;

	let rest = &line[marker + MARKER_LEN..];
	if rest.is_empty() || rest == " " {
		return Some("");
	}

	rest.strip_prefix(' ')
}

/// Split source content into docblocks: maximal runs of consecutive
/// documentation lines. `file` is recorded as the origin of each docblock.
pub fn extract_docblocks(content: &str, file: Option<&Path>) -> Vec<Docblock> {
	let mut docblocks = Vec::new();
	let mut active: Option<(usize, Vec<String>)> = None;

	for (index, line) in content.lines().enumerate() {
		match extract_doc_line(line) {
			Some(doc) => {
				active
					.get_or_insert_with(|| (index + 1, Vec::new()))
					.1
					.push(doc.to_string());
			}
			None => {
				if let Some((start, lines)) = active.take() {
					docblocks.push(finish_docblock(lines, file, start));
				}
			}
		}
	}

	if let Some((start, lines)) = active {
		docblocks.push(finish_docblock(lines, file, start));
	}

	docblocks
}

fn finish_docblock(lines: Vec<String>, file: Option<&Path>, line: usize) -> Docblock {
	let origin = file.map(|file| {
		Origin {
			file: file.to_path_buf(),
			line,
		}
	});

	Docblock::from_parts(lines, origin)
}
