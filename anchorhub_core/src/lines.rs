use std::path::Path;

use crate::AnchorHubError;
use crate::AnchorHubResult;

/// Split `content` into lines that keep their terminators, so joining the
/// result reproduces the input byte for byte.
pub fn split_lines(content: &str) -> Vec<String> {
	content.split_inclusive('\n').map(str::to_string).collect()
}

/// Read a file as terminator-preserving lines.
pub fn read_lines(path: &Path) -> AnchorHubResult<Vec<String>> {
	let content = std::fs::read_to_string(path).map_err(|e| AnchorHubError::ReadFile {
		path: path.display().to_string(),
		reason: e.to_string(),
	})?;

	Ok(split_lines(&content))
}

/// The terminator at the end of `line`: `"\r\n"`, `"\n"` or `""`.
pub fn line_ending(line: &str) -> &str {
	if line.ends_with("\r\n") {
		"\r\n"
	} else if line.ends_with('\n') {
		"\n"
	} else {
		""
	}
}
