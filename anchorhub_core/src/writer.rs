use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde::Serializer;

use crate::AnchorHubError;
use crate::AnchorHubResult;
use crate::collector::AnchorMap;
use crate::headings::HeadingRecognizer;
use crate::headings::HeadingSyntax;
use crate::lines::read_lines;
use crate::links::LinkRecognizer;
use crate::links::LinkSyntax;
use crate::switch::CodeBlockSwitch;
use crate::wrapper::TagWrapper;

/// One line rewrite applied by the [`Writer`].
#[derive(Debug, Clone)]
pub enum WriteStrategy {
	/// Strip the wrapper from a tagged heading.
	Heading(HeadingRecognizer),
	/// Replace tag fragments in links with their anchors.
	Link(LinkRecognizer),
}

impl WriteStrategy {
	/// Every strategy in the order it is applied to a line.
	pub fn all(wrapper: &TagWrapper) -> Vec<Self> {
		let headings = HeadingRecognizer::all(wrapper).into_iter().map(Self::Heading);
		let links = LinkRecognizer::all().into_iter().map(Self::Link);

		headings.chain(links).collect()
	}

	/// Human readable name used in summaries.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Heading(recognizer) => {
				match recognizer.syntax() {
					HeadingSyntax::Atx => "ATX headers",
					HeadingSyntax::Setext => "Setext headers",
				}
			}
			Self::Link(recognizer) => {
				match recognizer.syntax() {
					LinkSyntax::Inline => "inline links",
					LinkSyntax::Reference => "reference links",
				}
			}
		}
	}

	/// Apply the strategy to `current`. `next_line` is the raw line that
	/// follows in the file and is only consulted by Setext headings.
	pub fn modify(
		&self,
		current: &str,
		next_line: Option<&str>,
		anchors: &AnchorMap,
		file: &Path,
	) -> String {
		match self {
			Self::Heading(recognizer) => {
				recognizer
					.strip(current, next_line)
					.unwrap_or_else(|| current.to_string())
			}
			Self::Link(recognizer) => {
				if recognizer.test(current) {
					recognizer.modify(current, anchors, file)
				} else {
					current.to_string()
				}
			}
		}
	}
}

/// Per-strategy edit counts, in strategy order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditCounts {
	entries: Vec<(&'static str, usize)>,
}

impl EditCounts {
	fn for_strategies(strategies: &[WriteStrategy]) -> Self {
		Self {
			entries: strategies
				.iter()
				.map(|strategy| (strategy.label(), 0))
				.collect(),
		}
	}

	fn increment(&mut self, index: usize) {
		if let Some((_, count)) = self.entries.get_mut(index) {
			*count += 1;
		}
	}

	/// The count recorded for the strategy with `label`.
	pub fn get(&self, label: &str) -> Option<usize> {
		self.entries
			.iter()
			.find(|(name, _)| *name == label)
			.map(|(_, count)| *count)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
		self.entries.iter().copied()
	}

	pub fn total(&self) -> usize {
		self.entries.iter().map(|(_, count)| count).sum()
	}

	/// No strategy changed any line.
	pub fn is_empty(&self) -> bool {
		self.total() == 0
	}
}

impl Serialize for EditCounts {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.entries.iter().map(|(label, count)| (*label, *count)))
	}
}

/// Rewritten file contents computed by the [`Writer`].
#[derive(Debug, Clone, Default)]
pub struct WriteResult {
	/// Files with at least one changed line and their new content.
	pub updated_files: BTreeMap<PathBuf, String>,
	pub counts: EditCounts,
}

/// Rewrites tagged headings and tag links using a collected [`AnchorMap`].
#[derive(Debug, Clone)]
pub struct Writer {
	strategies: Vec<WriteStrategy>,
	counts: EditCounts,
}

impl Writer {
	pub fn new(wrapper: &TagWrapper) -> Self {
		let strategies = WriteStrategy::all(wrapper);
		let counts = EditCounts::for_strategies(&strategies);

		Self { strategies, counts }
	}

	pub fn strategies(&self) -> &[WriteStrategy] {
		&self.strategies
	}

	/// Counts accumulated over every file rewritten by this writer.
	pub fn counts(&self) -> &EditCounts {
		&self.counts
	}

	/// Rewrite every file in order. Files without changes are left out of the
	/// result.
	pub fn rewrite(&mut self, files: &[PathBuf], anchors: &AnchorMap) -> AnchorHubResult<WriteResult> {
		let mut updated_files = BTreeMap::new();

		for file in files {
			if let Some(content) = self.rewrite_file(file, anchors)? {
				updated_files.insert(file.clone(), content);
			}
		}

		Ok(WriteResult {
			updated_files,
			counts: self.counts.clone(),
		})
	}

	pub fn rewrite_file(&mut self, file: &Path, anchors: &AnchorMap) -> AnchorHubResult<Option<String>> {
		let lines = read_lines(file)?;
		Ok(self.rewrite_lines(&lines, anchors, file))
	}

	/// Rewrite `lines` as the content of `file`. Returns `None` when no line
	/// changed.
	pub fn rewrite_lines(&mut self, lines: &[String], anchors: &AnchorMap, file: &Path) -> Option<String> {
		let mut output = String::with_capacity(lines.iter().map(String::len).sum());
		let mut changed_lines = 0;
		let mut switch = CodeBlockSwitch::new();

		for (index, line) in lines.iter().enumerate() {
			switch = switch.observe(line);

			if switch.is_inside_code() {
				output.push_str(line);
			} else {
				let next_line = lines.get(index + 1).map(String::as_str);
				let mut current = line.clone();

				for (position, strategy) in self.strategies.iter().enumerate() {
					let modified = strategy.modify(&current, next_line, anchors, file);
					if modified != current {
						self.counts.increment(position);
						current = modified;
					}
				}

				if current != *line {
					tracing::trace!(file = %file.display(), line = index + 1, "rewrote line");
					changed_lines += 1;
				}
				output.push_str(&current);
			}

			switch = switch.arm();
		}

		tracing::debug!(file = %file.display(), changed_lines, "rewrote file");

		(changed_lines > 0).then_some(output)
	}
}

/// Where rewritten files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
	/// Replace the input files.
	Overwrite,
	/// Mirror each file to `output_root`, keeping its path relative to
	/// `input_root`.
	Directory {
		input_root: PathBuf,
		output_root: PathBuf,
	},
}

impl OutputTarget {
	/// The path `file` is written to.
	pub fn destination(&self, file: &Path) -> PathBuf {
		match self {
			Self::Overwrite => file.to_path_buf(),
			Self::Directory {
				input_root,
				output_root,
			} => {
				match file.strip_prefix(input_root) {
					Ok(relative) => output_root.join(relative),
					Err(_) => output_root.join(file.file_name().unwrap_or(file.as_os_str())),
				}
			}
		}
	}
}

/// Write the updated contents to disk. Returns the paths written.
pub fn write_outputs(result: &WriteResult, target: &OutputTarget) -> AnchorHubResult<Vec<PathBuf>> {
	let mut written = Vec::with_capacity(result.updated_files.len());

	for (file, content) in &result.updated_files {
		let destination = target.destination(file);
		let write_error = |e: std::io::Error| {
			AnchorHubError::WriteFile {
				path: destination.display().to_string(),
				reason: e.to_string(),
			}
		};

		if let Some(parent) = destination.parent() {
			std::fs::create_dir_all(parent).map_err(write_error)?;
		}
		std::fs::write(&destination, content).map_err(write_error)?;

		written.push(destination);
	}

	Ok(written)
}
