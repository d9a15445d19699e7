//! Path helpers shared by file discovery and link resolution.
//!
//! Files are keyed by absolute, lexically normalized paths so that a path
//! found on disk and the same path reached through a relative link compare
//! equal.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Make `path` absolute against the current directory and remove `.` and
/// `..` components without touching the file system.
pub fn absolutize(path: &Path) -> PathBuf {
	let joined = if path.is_absolute() {
		path.to_path_buf()
	} else {
		std::env::current_dir()
			.unwrap_or_else(|_| PathBuf::from("."))
			.join(path)
	};

	normalize(&joined)
}

/// Lexically remove `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();

	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				match normalized.components().next_back() {
					Some(Component::Normal(_)) => {
						normalized.pop();
					}
					Some(Component::RootDir | Component::Prefix(_)) => {}
					_ => normalized.push(component),
				}
			}
			Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
				normalized.push(component);
			}
		}
	}

	normalized
}

/// Resolve the target of a link found in `current_file`.
///
/// An empty link path refers to `current_file` itself. Absolute link paths
/// are used as given; relative ones are joined to the directory containing
/// `current_file`.
pub fn resolve_link_target(current_file: &Path, link_path: &str) -> PathBuf {
	if link_path.is_empty() {
		return current_file.to_path_buf();
	}

	let link = Path::new(link_path);
	if link.is_absolute() {
		return normalize(link);
	}

	let dir = current_file.parent().unwrap_or_else(|| Path::new(""));
	normalize(&dir.join(link))
}

/// Make a path relative to `root` for display purposes.
pub fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
