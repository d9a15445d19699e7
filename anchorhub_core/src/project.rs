use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::AnchorHubError;
use crate::AnchorHubResult;
use crate::collector::AnchorMap;
use crate::collector::Collection;
use crate::collector::Collector;
use crate::collector::DuplicateTag;
use crate::config::Settings;
use crate::converter::AnchorConverter;
use crate::paths::absolutize;
use crate::writer::OutputTarget;
use crate::writer::WriteResult;
use crate::writer::Writer;

/// Everything computed by [`run_project`]. Nothing has been written to disk.
#[derive(Debug, Clone)]
pub struct RunReport {
	/// Files parsed, in processing order.
	pub files: Vec<PathBuf>,
	pub collection: Collection,
	/// The rewritten files. `None` when duplicate tags stopped the run before
	/// any rewriting.
	pub result: Option<WriteResult>,
}

impl RunReport {
	pub fn anchors(&self) -> &AnchorMap {
		&self.collection.anchors
	}

	pub fn duplicates(&self) -> &BTreeMap<PathBuf, Vec<DuplicateTag>> {
		&self.collection.duplicates
	}

	/// Fail with [`AnchorHubError::DuplicateTags`] when any file repeats a
	/// tag.
	pub fn validate(&self) -> AnchorHubResult<()> {
		self.collection.validate()
	}
}

/// Find the files to parse.
///
/// A file input is returned as is, whatever its extension. A directory input
/// yields every file whose name ends with one of the configured extensions,
/// searching subdirectories only when `recursive` is set. The result is
/// sorted and every path is absolute.
pub fn discover_files(settings: &Settings) -> AnchorHubResult<Vec<PathBuf>> {
	if !settings.is_dir {
		return Ok(vec![absolutize(&settings.input)]);
	}

	let extensions = build_extension_set(&settings.extensions)?;
	let exclude = build_exclude_matcher(&settings.input_root, &settings.exclude_patterns)?;
	let skipped_output = (!settings.overwrite).then(|| absolutize(&settings.output));
	let walker = Walker {
		extensions: &extensions,
		exclude: &exclude,
		skipped_output: skipped_output.as_deref(),
		recursive: settings.recursive,
	};

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walker.walk(&settings.input, &mut files, &mut visited_dirs)?;

	let mut files: Vec<PathBuf> = files.into_iter().map(|file| absolutize(&file)).collect();
	files.sort();

	if files.is_empty() {
		return Err(AnchorHubError::NoInputFiles {
			root: settings.input.display().to_string(),
			extensions: settings.extensions.join(", "),
		});
	}

	Ok(files)
}

/// Discover, collect, validate and rewrite without touching disk.
///
/// When any file repeats a tag the run stops after collection and
/// [`RunReport::result`] is `None`.
pub fn run_project(settings: &Settings) -> AnchorHubResult<RunReport> {
	let files = discover_files(settings)?;
	tracing::debug!(count = files.len(), "discovered files");

	let collector = Collector::new(
		&settings.wrapper,
		AnchorConverter::new(settings.max_anchor_suffix),
	);
	let collection = collector.collect(&files)?;

	if collection.has_duplicates() {
		return Ok(RunReport {
			files,
			collection,
			result: None,
		});
	}

	let mut writer = Writer::new(&settings.wrapper);
	let result = writer.rewrite(&files, &collection.anchors)?;

	tracing::info!(
		files = files.len(),
		tags = collection.anchors.tag_count(),
		modified = result.updated_files.len(),
		edits = result.counts.total(),
		"anchorhub run complete"
	);

	Ok(RunReport {
		files,
		collection,
		result: Some(result),
	})
}

/// The output target described by `settings`.
pub fn output_target(settings: &Settings) -> OutputTarget {
	if settings.overwrite {
		OutputTarget::Overwrite
	} else {
		OutputTarget::Directory {
			input_root: settings.input_root.clone(),
			output_root: settings.output.clone(),
		}
	}
}

struct Walker<'a> {
	extensions: &'a GlobSet,
	exclude: &'a Gitignore,
	skipped_output: Option<&'a Path>,
	recursive: bool,
}

impl Walker<'_> {
	fn walk(
		&self,
		dir: &Path,
		files: &mut Vec<PathBuf>,
		visited_dirs: &mut HashSet<PathBuf>,
	) -> AnchorHubResult<()> {
		// Symlinked directories are followed once.
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !visited_dirs.insert(canonical) {
			return Ok(());
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();
			let is_dir = path.is_dir();

			if self.exclude.matched(&path, is_dir).is_ignore() {
				continue;
			}

			if is_dir {
				if !self.recursive || is_skipped_directory(&path, self.skipped_output) {
					continue;
				}
				self.walk(&path, files, visited_dirs)?;
			} else if path
				.file_name()
				.is_some_and(|name| self.extensions.is_match(name))
			{
				files.push(path);
			}
		}

		Ok(())
	}
}

fn is_skipped_directory(path: &Path, skipped_output: Option<&Path>) -> bool {
	if path.file_name().is_some_and(|name| name == ".git") {
		return true;
	}

	skipped_output.is_some_and(|output| absolutize(path) == output)
}

/// Build a `GlobSet` matching file names that end with any of `extensions`.
fn build_extension_set(extensions: &[String]) -> AnchorHubResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for extension in extensions {
		let glob = Glob::new(&format!("*{extension}")).map_err(|e| {
			AnchorHubError::ConfigParse(format!("invalid extension `{extension}`: {e}"))
		})?;
		builder.add(glob);
	}

	builder
		.build()
		.map_err(|e| AnchorHubError::ConfigParse(format!("failed to build extension set: {e}")))
}

/// Build a `Gitignore` matcher from `[exclude]` patterns.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> AnchorHubResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			AnchorHubError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}

	builder
		.build()
		.map_err(|e| AnchorHubError::ConfigParse(format!("failed to build exclude rules: {e}")))
}
