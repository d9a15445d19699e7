mod common;

use anchorhub_core::AnyEmptyResult;
use common::anchorhub_cmd;
use common::write_file;
use predicates::prelude::*;

const CUSTOM_DOC: &str = "# Install Steps <<#install>>\n\nSee [install](#install).\n";
const CUSTOM_EXPECTED: &str = "# Install Steps\n\nSee [install](#install-steps).\n";

#[test]
fn config_sets_wrapper_and_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(&tmp.path().join("docs/a.md"), CUSTOM_DOC)?;
	write_file(
		&tmp.path().join("docs/anchorhub.toml"),
		"wrapper = \"<< >>\"\noutput = \"../built\"\n",
	)?;

	anchorhub_cmd(tmp.path()).arg("docs").assert().success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("built/a.md"))?,
		CUSTOM_EXPECTED
	);

	Ok(())
}

#[test]
fn resolves_dot_config_anchorhub_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(&tmp.path().join("docs/a.md"), CUSTOM_DOC)?;
	write_file(
		&tmp.path().join("docs/.config/anchorhub.toml"),
		"wrapper = \"<< >>\"\n",
	)?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out"])
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/a.md"))?,
		CUSTOM_EXPECTED
	);

	Ok(())
}

#[test]
fn prefers_anchorhub_toml_over_other_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(&tmp.path().join("docs/a.md"), CUSTOM_DOC)?;
	write_file(&tmp.path().join("docs/anchorhub.toml"), "wrapper = \"<< >>\"\n")?;
	write_file(&tmp.path().join("docs/.anchorhub.toml"), "wrapper = \"{ }\"\n")?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out"])
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/a.md"))?,
		CUSTOM_EXPECTED
	);

	Ok(())
}

#[test]
fn command_line_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(
		&tmp.path().join("docs/a.md"),
		"# Install Steps {#install}\n\nSee [install](#install).\n",
	)?;
	write_file(&tmp.path().join("docs/anchorhub.toml"), "wrapper = \"<< >>\"\n")?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out", "--wrapper", "{ }"])
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/a.md"))?,
		CUSTOM_EXPECTED
	);

	Ok(())
}

#[test]
fn config_enables_recursion_and_excludes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(&tmp.path().join("docs/a.md"), "# Top Level {#top}\n")?;
	write_file(&tmp.path().join("docs/guide/b.md"), "[top](../a.md#top)\n")?;
	write_file(&tmp.path().join("docs/drafts/c.md"), "[top](../a.md#top)\n")?;
	write_file(
		&tmp.path().join("docs/anchorhub.toml"),
		"recursive = true\n\n[exclude]\npatterns = [\"drafts/\"]\n",
	)?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out"])
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/guide/b.md"))?,
		"[top](../a.md#top-level)\n"
	);
	assert!(!tmp.path().join("out/drafts/c.md").exists());

	Ok(())
}

#[test]
fn invalid_config_reports_parse_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(&tmp.path().join("docs/a.md"), "# Top {#top}\n")?;
	write_file(&tmp.path().join("docs/anchorhub.toml"), "recursive = \"yes\"\n")?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out"])
		.assert()
		.code(2)
		.stderr(predicate::str::contains("anchorhub::config_parse"));

	Ok(())
}
