use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::AnchorHubError;
use crate::AnchorHubResult;
use crate::converter::AnchorConverter;
use crate::headings::HeadingRecognizer;
use crate::lines::read_lines;
use crate::switch::CodeBlockSwitch;
use crate::wrapper::TagWrapper;

/// Tag to generated anchor for a single file.
pub type TagAnchors = BTreeMap<String, String>;

/// Generated anchors for every collected file, keyed by absolute path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnchorMap {
	files: BTreeMap<PathBuf, TagAnchors>,
}

impl AnchorMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, file: PathBuf, tags: TagAnchors) {
		self.files.insert(file, tags);
	}

	/// The tags collected for `file`, if it was collected.
	pub fn file(&self, file: &Path) -> Option<&TagAnchors> {
		self.files.get(file)
	}

	/// The anchor generated for `tag` in `file`.
	pub fn resolve(&self, file: &Path, tag: &str) -> Option<&str> {
		self.files
			.get(file)
			.and_then(|tags| tags.get(tag))
			.map(String::as_str)
	}

	pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &TagAnchors)> {
		self.files.iter()
	}

	/// Number of files in the map, including files without tags.
	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Total number of tags across all files.
	pub fn tag_count(&self) -> usize {
		self.files.values().map(BTreeMap::len).sum()
	}
}

/// A tag declared a second time in the same file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateTag {
	pub tag: String,
	/// 1-indexed line of the repeated declaration.
	pub line: usize,
	/// The anchor the first declaration of the tag resolved to.
	pub previous_anchor: String,
}

/// Tags and duplicates collected from a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCollection {
	pub anchors: TagAnchors,
	pub duplicates: Vec<DuplicateTag>,
}

/// The output of a collection run.
#[derive(Debug, Clone, Default)]
pub struct Collection {
	pub anchors: AnchorMap,
	/// Duplicate declarations keyed by file. Files without duplicates are
	/// absent.
	pub duplicates: BTreeMap<PathBuf, Vec<DuplicateTag>>,
}

impl Collection {
	pub fn has_duplicates(&self) -> bool {
		!self.duplicates.is_empty()
	}

	pub fn duplicate_count(&self) -> usize {
		self.duplicates.values().map(Vec::len).sum()
	}

	/// Fail when any file declares the same tag twice. Rewriting with an
	/// ambiguous mapping is never allowed.
	pub fn validate(&self) -> AnchorHubResult<()> {
		if !self.has_duplicates() {
			return Ok(());
		}

		let details = self
			.duplicates
			.iter()
			.flat_map(|(file, records)| {
				records.iter().map(move |record| {
					format!(
						"  {}:{}: tag `{}` already resolved to `{}`",
						file.display(),
						record.line,
						record.tag,
						record.previous_anchor
					)
				})
			})
			.collect::<Vec<_>>()
			.join("\n");

		Err(AnchorHubError::DuplicateTags {
			count: self.duplicate_count(),
			details,
		})
	}
}

/// Scans files for tagged headings and builds the [`AnchorMap`].
#[derive(Debug, Clone)]
pub struct Collector {
	recognizers: Vec<HeadingRecognizer>,
	converter: AnchorConverter,
}

impl Collector {
	pub fn new(wrapper: &TagWrapper, converter: AnchorConverter) -> Self {
		Self {
			recognizers: HeadingRecognizer::all(wrapper),
			converter,
		}
	}

	/// Collect every file in order. Files are keyed by the paths given.
	pub fn collect(&self, files: &[PathBuf]) -> AnchorHubResult<Collection> {
		let mut collection = Collection::default();

		for file in files {
			let FileCollection {
				anchors,
				duplicates,
			} = self.collect_file(file)?;

			tracing::debug!(
				file = %file.display(),
				tags = anchors.len(),
				duplicates = duplicates.len(),
				"collected file"
			);

			if !duplicates.is_empty() {
				collection.duplicates.insert(file.clone(), duplicates);
			}
			collection.anchors.insert(file.clone(), anchors);
		}

		Ok(collection)
	}

	pub fn collect_file(&self, file: &Path) -> AnchorHubResult<FileCollection> {
		let lines = read_lines(file)?;
		let collected = self.collect_lines(&lines)?;

		for duplicate in &collected.duplicates {
			tracing::warn!(
				file = %file.display(),
				line = duplicate.line,
				tag = %duplicate.tag,
				previous_anchor = %duplicate.previous_anchor,
				"duplicate tag"
			);
		}

		Ok(collected)
	}

	/// Collect the tags declared in `lines`, skipping fenced code blocks.
	///
	/// The first declaration of a tag wins; later declarations are recorded
	/// as duplicates.
	pub fn collect_lines(&self, lines: &[String]) -> AnchorHubResult<FileCollection> {
		let mut collected = FileCollection::default();
		let mut used: HashSet<String> = HashSet::new();
		let mut switch = CodeBlockSwitch::new();

		for (index, line) in lines.iter().enumerate() {
			switch = switch.observe(line);

			if !switch.is_inside_code() {
				let heading = self
					.recognizers
					.iter()
					.find_map(|recognizer| recognizer.get(lines, index));

				if let Some(heading) = heading {
					if let Some(previous) = collected.anchors.get(&heading.tag) {
						collected.duplicates.push(DuplicateTag {
							tag: heading.tag,
							line: index + 1,
							previous_anchor: previous.clone(),
						});
					} else {
						let anchor = self.converter.convert(&heading.text, &used)?;
						tracing::trace!(tag = %heading.tag, anchor = %anchor, "resolved tag");
						used.insert(anchor.clone());
						collected.anchors.insert(heading.tag, anchor);
					}
				}
			}

			switch = switch.arm();
		}

		Ok(collected)
	}
}
