mod common;

use anchorhub_core::AnyEmptyResult;
use common::DOC_A;
use common::anchorhub_cmd;
use common::docs_project;
use common::write_file;
use predicates::prelude::*;

const EXPECTED_A: &str =
	"# Overview\n\nSee [setup](b.md#getting-started) and [top](#overview).\n";
const EXPECTED_B: &str = "Getting Started\n===============\n\n[unknown](#totally-unrelated)\n";

#[test]
fn writes_to_output_directory() -> AnyEmptyResult {
	let tmp = docs_project()?;

	anchorhub_cmd(tmp.path())
		.arg("docs")
		.arg("out")
		.assert()
		.success()
		.stdout(predicate::str::contains("Summary:"))
		.stdout(predicate::str::contains("ATX headers"))
		.stdout(predicate::str::contains("Setext headers"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("out/a.md"))?, EXPECTED_A);
	assert_eq!(std::fs::read_to_string(tmp.path().join("out/b.md"))?, EXPECTED_B);
	assert_eq!(std::fs::read_to_string(tmp.path().join("docs/a.md"))?, DOC_A);

	Ok(())
}

#[test]
fn defaults_to_anchorhub_out() -> AnyEmptyResult {
	let tmp = docs_project()?;

	anchorhub_cmd(tmp.path()).arg("docs").assert().success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("anchorhub-out/a.md"))?,
		EXPECTED_A
	);

	Ok(())
}

#[test]
fn overwrites_in_place() -> AnyEmptyResult {
	let tmp = docs_project()?;

	anchorhub_cmd(tmp.path())
		.arg("docs")
		.arg("-X")
		.assert()
		.success();

	assert_eq!(std::fs::read_to_string(tmp.path().join("docs/a.md"))?, EXPECTED_A);
	assert!(!tmp.path().join("anchorhub-out").exists());

	Ok(())
}

#[test]
fn single_file_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(
		&tmp.path().join("notes.txt"),
		"## Setup Guide {#setup}\n\nJump to [setup](#setup).\n",
	)?;

	anchorhub_cmd(tmp.path())
		.arg("notes.txt")
		.arg("out")
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/notes.txt"))?,
		"## Setup Guide\n\nJump to [setup](#setup-guide).\n"
	);

	Ok(())
}

#[test]
fn recursive_alias_resolves_nested_links() -> AnyEmptyResult {
	let tmp = docs_project()?;
	write_file(
		&tmp.path().join("docs/guide/intro.md"),
		"Back to [setup](../b.md#start).\n",
	)?;

	anchorhub_cmd(tmp.path())
		.arg("docs")
		.arg("out")
		.arg("-R")
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/guide/intro.md"))?,
		"Back to [setup](../b.md#getting-started).\n"
	);

	Ok(())
}

#[test]
fn top_level_only_without_recursive() -> AnyEmptyResult {
	let tmp = docs_project()?;
	write_file(
		&tmp.path().join("docs/guide/intro.md"),
		"Back to [setup](../b.md#start).\n",
	)?;

	anchorhub_cmd(tmp.path())
		.arg("docs")
		.arg("out")
		.assert()
		.success();

	assert!(!tmp.path().join("out/guide/intro.md").exists());

	Ok(())
}

#[test]
fn custom_extensions_and_wrapper() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(
		&tmp.path().join("docs/page.txt"),
		"# Page Title [>#page<]\n[self](#page)\n",
	)?;
	write_file(&tmp.path().join("docs/skip.md"), "# Skipped [>#skip<]\n")?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out", "-e", "txt", "-w", "[> <]"])
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/page.txt"))?,
		"# Page Title\n[self](#page-title)\n"
	);
	assert!(!tmp.path().join("out/skip.md").exists());

	Ok(())
}

#[test]
fn dry_run_writes_nothing_and_shows_diff() -> AnyEmptyResult {
	let tmp = docs_project()?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out", "--dry-run", "--diff"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Dry run: would modify 2 of 2 file(s)"))
		.stdout(predicate::str::contains("-# Overview {#top}"))
		.stdout(predicate::str::contains("+# Overview\n"));

	assert!(!tmp.path().join("out").exists());

	Ok(())
}

#[test]
fn diff_requires_dry_run() -> AnyEmptyResult {
	let tmp = docs_project()?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out", "--diff"])
		.assert()
		.failure();

	Ok(())
}

#[test]
fn json_report() -> AnyEmptyResult {
	let tmp = docs_project()?;

	let output = anchorhub_cmd(tmp.path())
		.args(["docs", "out", "--format", "json"])
		.output()?;
	assert!(output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], true);
	assert_eq!(json["dry_run"], false);
	assert_eq!(json["files"], serde_json::json!(["a.md", "b.md"]));
	assert_eq!(json["modified"], serde_json::json!(["a.md", "b.md"]));
	assert_eq!(json["counts"]["ATX headers"], 1);
	assert_eq!(json["counts"]["Setext headers"], 1);
	assert_eq!(json["counts"]["inline links"], 1);
	assert_eq!(json["counts"]["reference links"], 0);
	assert_eq!(json["anchors"]["a.md"]["top"], "overview");
	assert_eq!(json["anchors"]["b.md"]["start"], "getting-started");

	Ok(())
}

#[test]
fn reports_when_nothing_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(&tmp.path().join("docs/plain.md"), "# Plain\n\n[link](#plain)\n")?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out"])
		.assert()
		.success()
		.stdout(predicate::str::contains("No AnchorHub tags or tag links found"));

	assert!(!tmp.path().join("out").exists());

	Ok(())
}

#[test]
fn verbose_lists_locations_and_files() -> AnyEmptyResult {
	let tmp = docs_project()?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out", "--verbose"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Root input directory:"))
		.stdout(predicate::str::contains("Parsing files:"))
		.stdout(predicate::str::contains("Modified files:"));

	Ok(())
}

#[test]
fn duplicate_tags_halt_before_writing() -> AnyEmptyResult {
	let tmp = docs_project()?;
	write_file(
		&tmp.path().join("docs/c.md"),
		"# One {#same}\n\n# Two {#same}\n",
	)?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out"])
		.assert()
		.code(2)
		.stderr(predicate::str::contains("anchorhub::duplicate_tag"))
		.stderr(predicate::str::contains("c.md:3"))
		.stderr(predicate::str::contains("anchorhub::duplicate_tags"));

	assert!(!tmp.path().join("out").exists());

	Ok(())
}

#[test]
fn duplicate_tags_in_json() -> AnyEmptyResult {
	let tmp = docs_project()?;
	write_file(&tmp.path().join("docs/c.md"), "# One {#same}\n# Two {#same}\n")?;

	let output = anchorhub_cmd(tmp.path())
		.args(["docs", "out", "--format", "json"])
		.output()?;
	assert_eq!(output.status.code(), Some(2));

	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], false);
	assert_eq!(json["duplicates"][0]["file"], "c.md");
	assert_eq!(json["duplicates"][0]["line"], 2);
	assert_eq!(json["duplicates"][0]["previous_anchor"], "one");

	Ok(())
}

#[test]
fn rejects_same_input_and_output() -> AnyEmptyResult {
	let tmp = docs_project()?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "docs"])
		.assert()
		.code(2)
		.stderr(predicate::str::contains("anchorhub::same_input_output"));

	Ok(())
}

#[test]
fn rejects_missing_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	anchorhub_cmd(tmp.path())
		.args(["missing", "out"])
		.assert()
		.code(2)
		.stderr(predicate::str::contains("anchorhub::missing_input"));

	Ok(())
}

#[test]
fn rejects_invalid_wrapper() -> AnyEmptyResult {
	let tmp = docs_project()?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out", "-w", "{"])
		.assert()
		.code(2)
		.stderr(predicate::str::contains("anchorhub::invalid_wrapper"));

	Ok(())
}

#[test]
fn rejects_directory_without_markdown() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(&tmp.path().join("docs/notes.txt"), "# Notes {#n}\n")?;

	anchorhub_cmd(tmp.path())
		.args(["docs", "out"])
		.assert()
		.code(2)
		.stderr(predicate::str::contains("anchorhub::no_input_files"));

	Ok(())
}
