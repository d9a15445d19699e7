use std::collections::BTreeMap;
use std::path::Path;
use std::process;

use anchorhub_cli::AnchorHubCli;
use anchorhub_cli::OutputFormat;
use anchorhub_core::AnchorHubError;
use anchorhub_core::DuplicateTag;
use anchorhub_core::EditCounts;
use anchorhub_core::RunReport;
use anchorhub_core::Settings;
use anchorhub_core::TagAnchors;
use anchorhub_core::WriteResult;
use anchorhub_core::output_target;
use anchorhub_core::paths::make_relative;
use anchorhub_core::run_project;
use anchorhub_core::write_outputs;
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "ANCHORHUB_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = AnchorHubCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminal support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	if let Err(e) = run(&args) {
		match e.downcast::<AnchorHubError>() {
			Ok(anchorhub_err) => {
				let report: miette::Report = (*anchorhub_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose {
		"warn,anchorhub=debug,anchorhub_core=debug"
	} else {
		"warn"
	};
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn run(args: &AnchorHubCli) -> Result<(), Box<dyn std::error::Error>> {
	let settings = Settings::resolve(&args.input, args.overrides())?;
	settings.validate()?;
	tracing::debug!(
		input = %settings.input.display(),
		output = %settings.output.display(),
		overwrite = settings.overwrite,
		recursive = settings.recursive,
		"resolved settings"
	);

	let text = args.format == OutputFormat::Text;
	if args.verbose && text {
		print_locations(&settings);
	}

	let report = run_project(&settings)?;
	let root = &settings.input_root;

	if args.verbose && text && settings.is_dir {
		print_file_list("Parsing files:", &report.files, root);
	}

	let Some(result) = &report.result else {
		match args.format {
			OutputFormat::Text => print_duplicates(report.duplicates(), root),
			OutputFormat::Json => print_json_duplicates(report.duplicates(), root)?,
		}
		report.validate()?;
		return Ok(());
	};

	if !args.dry_run {
		write_outputs(result, &output_target(&settings))?;
	}

	match args.format {
		OutputFormat::Text => print_text_report(args, &settings, &report, result),
		OutputFormat::Json => print_json_report(args, &settings, &report, result)?,
	}

	Ok(())
}

fn print_locations(settings: &Settings) {
	println!("Root input directory: \t{}", settings.input.display());
	if settings.overwrite {
		println!("Outputting to: \t\t{} (overwrite)\n", settings.input.display());
	} else {
		println!("Outputting to: \t\t{}\n", settings.output.display());
	}
}

fn print_file_list(title: &str, files: &[std::path::PathBuf], root: &Path) {
	println!("{}", colored!(title, bold));
	for file in files {
		println!("  {}", make_relative(file, root));
	}
	println!();
}

fn print_text_report(args: &AnchorHubCli, settings: &Settings, report: &RunReport, result: &WriteResult) {
	let root = &settings.input_root;

	if result.counts.is_empty() {
		println!("No AnchorHub tags or tag links found.");
		return;
	}

	let modified: Vec<_> = result.updated_files.keys().cloned().collect();
	if args.dry_run {
		println!(
			"Dry run: would modify {} of {} file(s):",
			modified.len(),
			report.files.len()
		);
		for file in &modified {
			println!("  {}", make_relative(file, root));
			if args.diff {
				print_file_diff(file, &result.updated_files[file]);
			}
		}
		println!();
	} else if args.verbose && settings.is_dir {
		print_file_list("Modified files:", &modified, root);
	}

	print_summary(&result.counts);
}

fn print_summary(counts: &EditCounts) {
	println!("{}", colored!("Summary:", bold));
	for (label, count) in counts.iter() {
		let count = if count > 0 {
			colored!(count.to_string(), green)
		} else {
			count.to_string()
		};
		println!("  {label:<18} {count}");
	}
}

fn print_file_diff(file: &Path, updated: &str) {
	match std::fs::read_to_string(file) {
		Ok(current) => print_diff(&current, updated),
		Err(e) => {
			eprintln!(
				"  {} could not read {}: {e}",
				colored!("warning:", yellow),
				file.display()
			);
		}
	}
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}

fn print_duplicates(duplicates: &BTreeMap<std::path::PathBuf, Vec<DuplicateTag>>, root: &Path) {
	for (file, records) in duplicates {
		let rel = make_relative(file, root);
		for record in records {
			eprintln!("{:?}", duplicate_to_report(record, &rel));
		}
	}
}

/// Convert a `DuplicateTag` into a `miette::Report` for rich terminal
/// display.
fn duplicate_to_report(record: &DuplicateTag, rel_path: &str) -> miette::Report {
	let message = format!(
		"[{rel_path}:{}] tag `{}` is already used by a previous heading",
		record.line, record.tag
	);
	let help = format!(
		"the first heading tagged `{}` resolves to `#{}`; give this heading a different tag",
		record.tag, record.previous_anchor
	);

	let diag_value = miette::MietteDiagnostic::new(message)
		.with_code("anchorhub::duplicate_tag")
		.with_help(help)
		.with_severity(miette::Severity::Error);
	miette::Report::new(diag_value)
}

#[derive(Serialize)]
struct JsonDuplicate<'a> {
	file: String,
	line: usize,
	tag: &'a str,
	previous_anchor: &'a str,
}

fn print_json_duplicates(
	duplicates: &BTreeMap<std::path::PathBuf, Vec<DuplicateTag>>,
	root: &Path,
) -> Result<(), serde_json::Error> {
	let entries: Vec<JsonDuplicate<'_>> = duplicates
		.iter()
		.flat_map(|(file, records)| {
			records.iter().map(move |record| {
				JsonDuplicate {
					file: make_relative(file, root),
					line: record.line,
					tag: &record.tag,
					previous_anchor: &record.previous_anchor,
				}
			})
		})
		.collect();

	let output = serde_json::json!({
		"ok": false,
		"duplicates": entries,
	});
	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
	ok: bool,
	dry_run: bool,
	files: Vec<String>,
	modified: Vec<String>,
	counts: &'a EditCounts,
	anchors: BTreeMap<String, &'a TagAnchors>,
}

fn print_json_report(
	args: &AnchorHubCli,
	settings: &Settings,
	report: &RunReport,
	result: &WriteResult,
) -> Result<(), serde_json::Error> {
	let root = &settings.input_root;
	let output = JsonReport {
		ok: true,
		dry_run: args.dry_run,
		files: report
			.files
			.iter()
			.map(|file| make_relative(file, root))
			.collect(),
		modified: result
			.updated_files
			.keys()
			.map(|file| make_relative(file, root))
			.collect(),
		counts: &result.counts,
		anchors: report
			.anchors()
			.files()
			.map(|(file, tags)| (make_relative(file, root), tags))
			.collect(),
	};
	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}
