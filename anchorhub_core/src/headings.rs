use serde::Serialize;

use crate::lines::line_ending;
use crate::wrapper::TagWrapper;
use crate::wrapper::WrapperMatch;

/// The heading syntaxes that can declare a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingSyntax {
	/// `## Heading text {#tag}`
	Atx,
	/// `Heading text {#tag}` underlined by a run of `=` or `-` on the next
	/// line.
	Setext,
}

/// A tag declared on a heading together with the text it converts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedHeading {
	pub tag: String,
	/// Raw heading text before the wrapper, untrimmed.
	pub text: String,
}

/// Recognizes tagged headings of one [`HeadingSyntax`].
#[derive(Debug, Clone)]
pub struct HeadingRecognizer {
	syntax: HeadingSyntax,
	wrapper: TagWrapper,
}

impl HeadingRecognizer {
	pub fn new(syntax: HeadingSyntax, wrapper: &TagWrapper) -> Self {
		Self {
			syntax,
			wrapper: wrapper.clone(),
		}
	}

	/// All recognizers in priority order: ATX before Setext.
	pub fn all(wrapper: &TagWrapper) -> Vec<Self> {
		vec![
			Self::new(HeadingSyntax::Atx, wrapper),
			Self::new(HeadingSyntax::Setext, wrapper),
		]
	}

	pub fn syntax(&self) -> HeadingSyntax {
		self.syntax
	}

	/// Whether `lines[index]` is a heading of this syntax declaring a tag.
	pub fn test(&self, lines: &[String], index: usize) -> bool {
		self.get(lines, index).is_some()
	}

	/// Extract the tag and heading text declared on `lines[index]`.
	pub fn get(&self, lines: &[String], index: usize) -> Option<TaggedHeading> {
		let line = lines.get(index)?;
		let next_line = lines.get(index + 1).map(String::as_str);
		let (found, text_start) = self.find(line, next_line)?;

		Some(TaggedHeading {
			tag: line[found.tag].to_string(),
			text: line[text_start..found.start].to_string(),
		})
	}

	/// Remove the wrapper and the whitespace before it from a tagged heading,
	/// keeping the line terminator. Returns `None` when `line` is not a tagged
	/// heading of this syntax.
	pub fn strip(&self, line: &str, next_line: Option<&str>) -> Option<String> {
		let (found, _) = self.find(line, next_line)?;
		let heading = line[..found.start].trim_end();

		Some(format!("{heading}{}", line_ending(line)))
	}

	/// Locate the wrapper and the offset where heading text begins.
	fn find(&self, line: &str, next_line: Option<&str>) -> Option<(WrapperMatch, usize)> {
		match self.syntax {
			HeadingSyntax::Atx => {
				let hashes = line.bytes().take_while(|byte| *byte == b'#').count();
				if hashes == 0 || line.as_bytes().get(hashes) != Some(&b' ') {
					return None;
				}

				// At least one character of heading text must precede the
				// wrapper.
				let text_start = hashes + 1;
				let found = self.wrapper.find_trailing(line, text_start + 1)?;
				Some((found, text_start))
			}
			HeadingSyntax::Setext => {
				if !is_setext_underline(next_line?) {
					return None;
				}

				let found = self.wrapper.find_trailing(line, 1)?;
				Some((found, 0))
			}
		}
	}
}

/// A Setext underline: one or more of the same character, all `=` or all
/// `-`, optionally followed by whitespace.
pub fn is_setext_underline(line: &str) -> bool {
	let underline = line.trim_end();
	let mut chars = underline.chars();

	match chars.next() {
		Some(first @ ('=' | '-')) => chars.all(|ch| ch == first),
		_ => false,
	}
}
