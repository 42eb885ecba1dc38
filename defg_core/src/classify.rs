//! Pure predicates that sort a single line into the categories the differ
//! cares about. Matching is case-sensitive and only ever trims surrounding
//! whitespace.

const INSERT_BLOCK_CLASS: &str = "insert-block";

/// Returns `true` for lines that are empty or contain only whitespace.
pub fn is_blank(line: &str) -> bool {
	line.trim().is_empty()
}

/// Returns `true` if the line is an image reference (`![alt](url)`) or
/// consists of a single HTML tag such as `<img src="logo.png">` or
/// `<div class="page-break" />`.
///
/// Special lines found in a document are hand-added formatting and are kept
/// even when no docblock contains them.
pub fn is_special_line(line: &str) -> bool {
	is_image_reference(line) || is_sole_html_tag(line)
}

fn is_image_reference(line: &str) -> bool {
	let Some(rest) = line.trim().strip_prefix("![") else {
		return false;
	};
	let Some(rest) = rest.strip_suffix(')') else {
		return false;
	};

	rest.contains("](")
}

fn is_sole_html_tag(line: &str) -> bool {
	let Some(inner) = line
		.trim()
		.strip_prefix('<')
		.and_then(|rest| rest.strip_suffix('>'))
	else {
		return false;
	};

	!inner.contains('>')
}

/// Returns `true` if the line opens an insert-block region, i.e. a `<div>`
/// whose `class` attribute contains `insert-block`. Attribute order and
/// spacing are irrelevant.
///
/// ```
/// use defg_core::is_insert_block_open;
///
/// assert!(is_insert_block_open(r#"<div class="note insert-block">"#));
/// assert!(is_insert_block_open(r#"  <div id="x" class='insert-block'>"#));
/// assert!(!is_insert_block_open(r#"<div class="page-break">"#));
/// ```
pub fn is_insert_block_open(line: &str) -> bool {
	let trimmed = line.trim();
	let Some(attributes) = trimmed.strip_prefix("<div") else {
		return false;
	};

	if !trimmed.ends_with('>') || !attributes.starts_with(char::is_whitespace) {
		return false;
	}

	class_attribute(attributes).is_some_and(|value| value.contains(INSERT_BLOCK_CLASS))
}

/// Returns `true` if the line, trimmed, is exactly `</div>`.
pub fn is_insert_block_close(line: &str) -> bool {
	line.trim() == "</div>"
}

/// An opening line that is also closed on the same line
/// (`<div class="insert-block">text</div>` or a self-closing tag). Such a
/// line is opaque on its own and does not start a multi-line region.
pub fn is_self_contained_insert_block(line: &str) -> bool {
	if !is_insert_block_open(line) {
		return false;
	}

	let trimmed = line.trim();
	trimmed.ends_with("</div>") || trimmed.ends_with("/>")
}

/// Find the value of the first `class="..."` (or single quoted) attribute.
fn class_attribute(attributes: &str) -> Option<&str> {
	let mut search_from = 0;

	while let Some(found) = attributes[search_from..].find("class") {
		let start = search_from + found;
		let end = start + "class".len();
		search_from = end;

		let preceded_by_space = attributes[..start]
			.chars()
			.next_back()
			.is_some_and(char::is_whitespace);
		if !preceded_by_space {
			continue;
		}

		let Some(value) = attributes[end..].trim_start().strip_prefix('=') else {
			continue;
		};
		let value = value.trim_start();
		let Some(quote) = value.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
			continue;
		};
		let quoted = &value[1..];
		if let Some(close) = quoted.find(quote) {
			return Some(&quoted[..close]);
		}
	}

	None
}
