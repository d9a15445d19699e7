use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::collector::AnchorMap;
use crate::paths::resolve_link_target;

/// Inline link whose target contains a `#` fragment:
/// `[text](path#tag)`, with optional whitespace around the target.
static INLINE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"\[[^\[\]]+\]\s*\(\s*(?<target>[^\s)]*#[^\s)]+)\s*\)")
		.expect("Invalid INLINE_LINK_RE regex")
});

/// Reference link definition whose target contains a `#` fragment:
/// `[ref]: path#tag "optional title"`.
static REFERENCE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r#"^ {0,3}\[.+\]:\s+(?<target>\S*#\S+)(?:\s+".+"|\s+'.+'|\s+\(.+\))?\s*$"#)
		.expect("Invalid REFERENCE_LINK_RE regex")
});

/// The link syntaxes whose `#tag` fragments are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSyntax {
	Inline,
	Reference,
}

/// Rewrites `#tag` fragments in links to the anchors collected for the
/// linked file.
///
/// Fragments that do not name a collected tag are left untouched; they may be
/// ordinary anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRecognizer {
	syntax: LinkSyntax,
}

impl LinkRecognizer {
	pub fn new(syntax: LinkSyntax) -> Self {
		Self { syntax }
	}

	/// All recognizers in the order they are applied.
	pub fn all() -> Vec<Self> {
		vec![
			Self::new(LinkSyntax::Inline),
			Self::new(LinkSyntax::Reference),
		]
	}

	pub fn syntax(&self) -> LinkSyntax {
		self.syntax
	}

	fn regex(&self) -> &'static Regex {
		match self.syntax {
			LinkSyntax::Inline => &*INLINE_LINK_RE,
			LinkSyntax::Reference => &*REFERENCE_LINK_RE,
		}
	}

	/// Whether `line` contains a link of this syntax with a fragment.
	pub fn test(&self, line: &str) -> bool {
		self.regex().is_match(line)
	}

	/// Rewrite every resolvable tag fragment on `line`.
	pub fn modify(&self, line: &str, anchors: &AnchorMap, current_file: &Path) -> String {
		let mut changed = String::with_capacity(line.len());
		let mut last_index = 0;

		for caps in self.regex().captures_iter(line) {
			let (Some(whole), Some(target)) = (caps.get(0), caps.name("target")) else {
				continue;
			};

			let Some(anchor) = resolve_fragment(target.as_str(), anchors, current_file) else {
				continue;
			};

			// Everything up to and including `#` is kept as written.
			let hash_index = target.start() + fragment_offset(target.as_str());
			changed.push_str(&line[last_index..=hash_index]);
			changed.push_str(anchor);

			last_index = match self.syntax {
				LinkSyntax::Inline => {
					changed.push(')');
					whole.end()
				}
				LinkSyntax::Reference => target.end(),
			};
		}

		changed.push_str(&line[last_index..]);
		changed
	}
}

/// Offset of the `#` separating the path from the tag.
fn fragment_offset(target: &str) -> usize {
	target.find('#').unwrap_or(0)
}

/// Split a link target at its first `#` into `(path, tag)`.
pub fn split_target(target: &str) -> (&str, &str) {
	let hash = fragment_offset(target);
	(&target[..hash], target[hash + 1..].trim())
}

fn resolve_fragment<'m>(
	target: &str,
	anchors: &'m AnchorMap,
	current_file: &Path,
) -> Option<&'m str> {
	let (link_path, tag) = split_target(target);
	let file_key = resolve_link_target(current_file, link_path);
	anchors.resolve(&file_key, tag)
}
