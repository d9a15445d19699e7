use std::path::PathBuf;

use anchorhub_core::SettingsOverrides;
use clap::Parser;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Compile stable heading tags in markdown into renderer-style anchors.",
	long_about = "anchorhub parses markdown files and precompiles links to specially formatted \
	              anchors.\n\nTag a heading once with `{#tag}` and link to it with `#tag` from \
	              anywhere in the project. anchorhub rewrites every tag into the anchor GitHub \
	              generates from the heading text, so links keep working when headings are \
	              renamed.\n\nExamples:\n  anchorhub docs/           Write results to \
	              ./anchorhub-out\n  anchorhub docs/ -X -r     Rewrite docs/ and its \
	              subdirectories in place\n  anchorhub README.md --dry-run --diff"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnchorHubCli {
	/// Path of the file or directory to parse.
	#[arg(default_value = ".")]
	pub input: PathBuf,

	/// Desired output location (default is "anchorhub-out").
	pub output: Option<PathBuf>,

	/// Overwrite input files; ignore the output location.
	#[arg(short = 'X', long, default_value_t = false)]
	pub overwrite: bool,

	/// File extensions to search and run anchorhub on. Repeat the flag or
	/// separate values with commas.
	#[arg(short, long, value_delimiter = ',')]
	pub extensions: Option<Vec<String>>,

	/// Custom wrapper format, written as the opening and closing pattern
	/// separated by a space (default is "{ }").
	#[arg(short, long)]
	pub wrapper: Option<String>,

	/// Run anchorhub on the whole file hierarchy rooted at the input. Tags are
	/// resolved across every file in the hierarchy.
	#[arg(short = 'r', short_alias = 'R', long, default_value_t = false)]
	pub recursive: bool,

	/// Generate verbose output with summary stats.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Compute and report changes without writing any files.
	#[arg(long, default_value_t = false)]
	pub dry_run: bool,

	/// Show a line diff for every file that would change. Requires
	/// `--dry-run`.
	#[arg(long, default_value_t = false, requires = "dry_run")]
	pub diff: bool,

	/// Output format for the run report. Use `text` for human-readable output
	/// or `json` for programmatic consumption.
	#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

impl AnchorHubCli {
	/// Command line values that take precedence over `anchorhub.toml`. Flags
	/// that were not passed leave the config file in charge.
	pub fn overrides(&self) -> SettingsOverrides {
		SettingsOverrides {
			wrapper: self.wrapper.clone(),
			extensions: self.extensions.clone(),
			output: self.output.clone(),
			recursive: self.recursive.then_some(true),
			overwrite: self.overwrite.then_some(true),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
