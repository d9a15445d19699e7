use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum AnchorHubError {
	#[error(transparent)]
	#[diagnostic(code(anchorhub::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{path}`: {reason}")]
	#[diagnostic(code(anchorhub::read_file))]
	ReadFile { path: String, reason: String },

	#[error("failed to write `{path}`: {reason}")]
	#[diagnostic(code(anchorhub::write_file))]
	WriteFile { path: String, reason: String },

	#[error("invalid tag wrapper: `{0}`")]
	#[diagnostic(
		code(anchorhub::invalid_wrapper),
		help(
			"a wrapper must be two whitespace-separated patterns, for example `\"{{ }}\"` or \
			 `\"[[ ]]\"`"
		)
	)]
	InvalidWrapper(String),

	#[error("no files with extension(s) {extensions} found in `{root}`")]
	#[diagnostic(
		code(anchorhub::no_input_files),
		help("use `--extensions` to search other file types or `--recursive` to search subdirectories")
	)]
	NoInputFiles { root: String, extensions: String },

	#[error("input path does not exist: `{path}`")]
	#[diagnostic(code(anchorhub::missing_input))]
	MissingInput { path: String },

	#[error("input and output locations are the same: `{path}`")]
	#[diagnostic(
		code(anchorhub::same_input_output),
		help("pass `--overwrite` (`-X`) to rewrite the input files in place")
	)]
	SameInputOutput { path: String },

	#[error("found {count} duplicate tag(s):\n{details}")]
	#[diagnostic(
		code(anchorhub::duplicate_tags),
		help("every tag must be unique within its file; rename the repeated tags and run again")
	)]
	DuplicateTags { count: usize, details: String },

	#[error("could not find a unique anchor for `{base}` within {limit} suffixes")]
	#[diagnostic(
		code(anchorhub::anchor_overflow),
		help("too many headings share this text; raise `max_anchor_suffix` in anchorhub.toml")
	)]
	AnchorOverflow { base: String, limit: usize },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(anchorhub::config_parse),
		help("check that anchorhub.toml is valid TOML")
	)]
	ConfigParse(String),
}

pub type AnchorHubResult<T> = Result<T, AnchorHubError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
