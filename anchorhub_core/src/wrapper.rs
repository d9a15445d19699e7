use std::ops::Range;

use crate::AnchorHubError;
use crate::AnchorHubResult;

/// The default wrapper, producing tags written as `{#tag}`.
pub const DEFAULT_WRAPPER: &str = "{ }";

/// The open/close delimiter pair that marks a tag at the end of a heading
/// line, e.g. `{` and `}` for `## Heading {#tag}`.
///
/// Delimiters are matched as literal tokens. A tag may contain any
/// non-whitespace characters except an occurrence of either delimiter, so a
/// doubled sequence such as `{{#tag}}` never partially matches the `{ }`
/// wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWrapper {
	open: String,
	close: String,
}

/// Byte offsets of a wrapper found at the end of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperMatch {
	/// Offset of the first byte of the opening delimiter.
	pub start: usize,
	/// The tag text between `#` and the closing delimiter.
	pub tag: Range<usize>,
	/// Offset one past the last byte of the closing delimiter.
	pub end: usize,
}

impl TagWrapper {
	pub fn new(open: impl Into<String>, close: impl Into<String>) -> AnchorHubResult<Self> {
		let open = open.into();
		let close = close.into();

		if open.is_empty()
			|| close.is_empty()
			|| open.chars().any(char::is_whitespace)
			|| close.chars().any(char::is_whitespace)
		{
			return Err(AnchorHubError::InvalidWrapper(format!("{open} {close}")));
		}

		Ok(Self { open, close })
	}

	/// Parse a wrapper written as `"<open> <close>"`.
	pub fn parse(value: &str) -> AnchorHubResult<Self> {
		let parts: Vec<&str> = value.split_whitespace().collect();
		let [open, close] = parts.as_slice() else {
			return Err(AnchorHubError::InvalidWrapper(value.to_string()));
		};

		Self::new(*open, *close)
	}

	pub fn open(&self) -> &str {
		&self.open
	}

	pub fn close(&self) -> &str {
		&self.close
	}

	/// Find a wrapper that ends the line, ignoring trailing whitespace.
	///
	/// The opening delimiter must start at or after `min_start` and must not
	/// directly follow another delimiter, so `{{#tag}` and `}{#tag}` are not
	/// tags. When several opening delimiters qualify the rightmost one wins.
	pub fn find_trailing(&self, line: &str, min_start: usize) -> Option<WrapperMatch> {
		let trimmed = line.trim_end();
		let body = trimmed.strip_suffix(self.close.as_str())?;
		let end = trimmed.len();
		let inner_end = body.trim_end().len();

		for (start, _) in body.rmatch_indices(self.open.as_str()) {
			if start < min_start {
				break;
			}

			let before = &line[..start];
			if before.ends_with(self.open.as_str()) || before.ends_with(self.close.as_str()) {
				continue;
			}

			let after_open = start + self.open.len();
			if after_open > inner_end {
				continue;
			}

			let between = &line[after_open..inner_end];
			let hash = after_open + (between.len() - between.trim_start().len());
			if !line[hash..inner_end].starts_with('#') {
				continue;
			}

			let tag = (hash + 1)..inner_end;
			if self.is_valid_tag(line, tag.clone()) {
				return Some(WrapperMatch { start, tag, end });
			}
		}

		None
	}

	/// Every tag character must be non-whitespace and must not begin an
	/// occurrence of either delimiter, looking ahead into the rest of the line.
	fn is_valid_tag(&self, line: &str, tag: Range<usize>) -> bool {
		if tag.is_empty() {
			return false;
		}

		line[tag.clone()].char_indices().all(|(offset, ch)| {
			let rest = &line[tag.start + offset..];
			!ch.is_whitespace() && !rest.starts_with(&self.open) && !rest.starts_with(&self.close)
		})
	}
}

impl Default for TagWrapper {
	fn default() -> Self {
		Self {
			open: "{".to_string(),
			close: "}".to_string(),
		}
	}
}
