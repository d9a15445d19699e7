use std::collections::HashSet;

use crate::AnchorHubError;
use crate::AnchorHubResult;

/// Default number of numeric suffixes tried before giving up on finding a
/// unique anchor.
pub const DEFAULT_MAX_ANCHOR_SUFFIX: usize = 1000;

/// Converts heading text into GitHub-style anchors.
///
/// The conversion is deterministic: the heading is trimmed and lowercased,
/// every run of whitespace becomes a single hyphen, and every character that
/// is not alphanumeric, `_` or `-` is dropped. Hyphen runs are preserved as
/// they appear, so `"a--- --- b"` becomes `"a--------b"`.
///
/// Anchors already used in the same file are avoided by appending `-1`,
/// `-2`, ... to the base anchor.
#[derive(Debug, Clone, Copy)]
pub struct AnchorConverter {
	max_suffix: usize,
}

impl AnchorConverter {
	pub fn new(max_suffix: usize) -> Self {
		Self { max_suffix }
	}

	pub fn max_suffix(&self) -> usize {
		self.max_suffix
	}

	/// Convert `heading` into an anchor not present in `used`.
	pub fn convert(&self, heading: &str, used: &HashSet<String>) -> AnchorHubResult<String> {
		let base = slugify(heading);
		if !used.contains(&base) {
			return Ok(base);
		}

		for suffix in 1..=self.max_suffix {
			let candidate = format!("{base}-{suffix}");
			if !used.contains(&candidate) {
				return Ok(candidate);
			}
		}

		Err(AnchorHubError::AnchorOverflow {
			base,
			limit: self.max_suffix,
		})
	}
}

impl Default for AnchorConverter {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_ANCHOR_SUFFIX)
	}
}

/// The base anchor for `heading`, without collision handling.
///
/// "Alphanumeric" is Rust's `char::is_alphanumeric`, which includes combining
/// vowel signs such as Devanagari `ि`. Those are kept, as GitHub keeps them.
pub fn slugify(heading: &str) -> String {
	let lowered = heading.trim().to_lowercase();
	let mut anchor = String::with_capacity(lowered.len());
	let mut in_whitespace = false;

	for ch in lowered.chars() {
		if ch.is_whitespace() {
			if !in_whitespace {
				anchor.push('-');
			}
			in_whitespace = true;
			continue;
		}

		in_whitespace = false;
		if ch.is_alphanumeric() || ch == '_' || ch == '-' {
			anchor.push(ch);
		}
	}

	anchor
}
