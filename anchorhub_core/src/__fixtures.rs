use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::collector::AnchorMap;
use crate::collector::TagAnchors;
use crate::config::AnchorHubConfig;
use crate::config::Settings;
use crate::config::SettingsOverrides;
use crate::lines::split_lines;

pub fn lines(content: &str) -> Vec<String> {
	split_lines(content)
}

pub fn tag_anchors(pairs: &[(&str, &str)]) -> TagAnchors {
	pairs
		.iter()
		.map(|(tag, anchor)| ((*tag).to_string(), (*anchor).to_string()))
		.collect()
}

pub fn anchor_map(files: &[(&str, &[(&str, &str)])]) -> AnchorMap {
	let mut map = AnchorMap::new();
	for (file, pairs) in files {
		map.insert(PathBuf::from(file), tag_anchors(pairs));
	}
	map
}

/// Write `files` into a fresh temporary directory. Parent directories are
/// created as needed.
pub fn project(files: &[(&str, &str)]) -> TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	for (name, content) in files {
		write_file(&tmp.path().join(name), content);
	}
	tmp
}

pub fn write_file(path: &Path, content: &str) {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

pub fn read_file(path: &Path) -> String {
	std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Settings for a directory input at `root`, writing to `root/out`.
pub fn directory_settings(root: &Path, overrides: SettingsOverrides) -> Settings {
	let overrides = SettingsOverrides {
		output: overrides.output.or_else(|| Some(root.join("out"))),
		..overrides
	};

	Settings::from_config(
		root.to_path_buf(),
		root.to_path_buf(),
		true,
		AnchorHubConfig::default(),
		overrides,
	)
	.unwrap_or_else(|e| panic!("settings: {e}"))
}
