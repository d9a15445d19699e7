use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::AnchorHubError;
use crate::AnchorHubResult;
use crate::converter::DEFAULT_MAX_ANCHOR_SUFFIX;
use crate::paths::absolutize;
use crate::wrapper::DEFAULT_WRAPPER;
use crate::wrapper::TagWrapper;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"anchorhub.toml",
	".anchorhub.toml",
	".config/anchorhub.toml",
];

/// Output directory used when neither the command line nor the config file
/// names one. Relative to the current directory.
pub const DEFAULT_OUTPUT_DIR: &str = "anchorhub-out";

/// File extensions parsed when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

/// Configuration loaded from an `anchorhub.toml` file.
///
/// ```toml
/// wrapper = "{ }"
/// extensions = [".md", ".markdown"]
/// output = "anchorhub-out"
/// recursive = true
/// overwrite = false
/// max_anchor_suffix = 1000
///
/// [exclude]
/// patterns = ["drafts/", "*.generated.md"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorHubConfig {
	/// Open and close delimiters separated by whitespace.
	#[serde(default)]
	pub wrapper: Option<String>,
	#[serde(default)]
	pub extensions: Option<Vec<String>>,
	/// Output directory, relative to the directory holding the config file's
	/// project.
	#[serde(default)]
	pub output: Option<PathBuf>,
	#[serde(default)]
	pub recursive: Option<bool>,
	#[serde(default)]
	pub overwrite: Option<bool>,
	/// Largest numeric suffix tried when heading anchors collide.
	#[serde(default)]
	pub max_anchor_suffix: Option<usize>,
	#[serde(default)]
	pub exclude: ExcludeConfig,
}

/// Files and directories skipped during discovery.
///
/// Patterns follow gitignore syntax and are relative to the input directory.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl AnchorHubConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> AnchorHubResult<Option<AnchorHubConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path).map_err(|e| {
			AnchorHubError::ReadFile {
				path: config_path.display().to_string(),
				reason: e.to_string(),
			}
		})?;
		let config: AnchorHubConfig =
			toml::from_str(&content).map_err(|e| AnchorHubError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}
}

/// Values given on the command line. Each one takes precedence over the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
	pub wrapper: Option<String>,
	pub extensions: Option<Vec<String>>,
	/// Output location, relative to the current directory.
	pub output: Option<PathBuf>,
	pub recursive: Option<bool>,
	pub overwrite: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
	/// The file or directory given as input, absolute.
	pub input: PathBuf,
	/// The input directory, or the parent of a single input file.
	pub input_root: PathBuf,
	pub is_dir: bool,
	/// Output directory, absolute. Ignored when `overwrite` is set.
	pub output: PathBuf,
	pub wrapper: TagWrapper,
	pub extensions: Vec<String>,
	pub recursive: bool,
	pub overwrite: bool,
	pub max_anchor_suffix: usize,
	pub exclude_patterns: Vec<String>,
}

impl Settings {
	/// Resolve settings for `input`, reading the config file found next to
	/// it and applying `overrides` on top.
	pub fn resolve(input: &Path, overrides: SettingsOverrides) -> AnchorHubResult<Self> {
		let input = absolutize(input);
		if !input.exists() {
			return Err(AnchorHubError::MissingInput {
				path: input.display().to_string(),
			});
		}

		let is_dir = input.is_dir();
		let input_root = if is_dir {
			input.clone()
		} else {
			input
				.parent()
				.map_or_else(|| input.clone(), Path::to_path_buf)
		};

		let config = AnchorHubConfig::load(&input_root)?.unwrap_or_default();
		Self::from_config(input, input_root, is_dir, config, overrides)
	}

	/// Merge a loaded config with command line overrides.
	pub fn from_config(
		input: PathBuf,
		input_root: PathBuf,
		is_dir: bool,
		config: AnchorHubConfig,
		overrides: SettingsOverrides,
	) -> AnchorHubResult<Self> {
		let wrapper = match overrides.wrapper.or(config.wrapper) {
			Some(value) => TagWrapper::parse(&value)?,
			None => TagWrapper::parse(DEFAULT_WRAPPER)?,
		};

		let output = match (overrides.output, config.output) {
			(Some(output), _) => absolutize(&output),
			(None, Some(output)) => absolutize(&input_root.join(output)),
			(None, None) => absolutize(Path::new(DEFAULT_OUTPUT_DIR)),
		};

		let extensions = overrides
			.extensions
			.or(config.extensions)
			.unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect())
			.into_iter()
			.map(|ext| normalize_extension(&ext))
			.collect();

		Ok(Self {
			input,
			input_root,
			is_dir,
			output,
			wrapper,
			extensions,
			recursive: overrides.recursive.or(config.recursive).unwrap_or(false),
			overwrite: overrides.overwrite.or(config.overwrite).unwrap_or(false),
			max_anchor_suffix: config.max_anchor_suffix.unwrap_or(DEFAULT_MAX_ANCHOR_SUFFIX),
			exclude_patterns: config.exclude.patterns,
		})
	}

	/// Reject settings that would write over the input without `overwrite`.
	pub fn validate(&self) -> AnchorHubResult<()> {
		if !self.input.exists() {
			return Err(AnchorHubError::MissingInput {
				path: self.input.display().to_string(),
			});
		}

		if !self.overwrite && (self.output == self.input || self.output == self.input_root) {
			return Err(AnchorHubError::SameInputOutput {
				path: self.output.display().to_string(),
			});
		}

		Ok(())
	}
}

/// Extensions are matched with their leading dot; `md` and `.md` are the
/// same.
fn normalize_extension(ext: &str) -> String {
	let ext = ext.trim();
	if ext.starts_with('.') {
		ext.to_string()
	} else {
		format!(".{ext}")
	}
}
