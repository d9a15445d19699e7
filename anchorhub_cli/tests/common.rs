#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const DOC_A: &str = "# Overview {#top}\n\nSee [setup](b.md#start) and [top](#top).\n";
pub const DOC_B: &str = "Getting Started {#start}\n===============\n\n[unknown](#totally-unrelated)\n";

/// The `anchorhub` binary with colors disabled, running inside `dir` so the
/// default output location never lands in the source tree.
pub fn anchorhub_cmd(dir: &Path) -> Command {
	let mut cmd = Command::new(get_cargo_bin("anchorhub"));
	cmd.env("NO_COLOR", "1").env_remove("ANCHORHUB_LOG").current_dir(dir);
	cmd
}

pub fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// A `docs/` directory holding two linked documents.
pub fn docs_project() -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	write_file(&tmp.path().join("docs/a.md"), DOC_A)?;
	write_file(&tmp.path().join("docs/b.md"), DOC_B)?;
	Ok(tmp)
}
