//! `anchorhub_core` rewrites Markdown so that author-chosen heading tags such
//! as `{#start}` become the anchors a renderer like GitHub generates from the
//! heading text. Links can then point at a stable tag that survives edits to
//! the heading itself.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Input file or directory
//!   → Discovery (extension filter, exclude patterns)
//!   → Collector (code-block switch + heading recognizers + anchor converter)
//!   → Validation (duplicate tags halt the run)
//!   → Writer (heading stripping, inline links, reference links)
//!   → Output (overwrite in place or mirror into an output directory)
//! ```
//!
//! ## Key Types
//!
//! - [`TagWrapper`]: the open/close delimiter pair marking a tag.
//! - [`AnchorConverter`]: heading text to a unique GitHub-style anchor.
//! - [`Collector`]: builds the [`AnchorMap`] and records [`DuplicateTag`]s.
//! - [`Writer`]: applies every [`WriteStrategy`] and counts edits.
//! - [`Settings`]: resolved configuration from `anchorhub.toml` and the
//!   command line.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anchorhub_core::Settings;
//! use anchorhub_core::SettingsOverrides;
//! use anchorhub_core::output_target;
//! use anchorhub_core::run_project;
//! use anchorhub_core::write_outputs;
//! use std::path::Path;
//!
//! let settings = Settings::resolve(Path::new("docs"), SettingsOverrides::default()).unwrap();
//! settings.validate().unwrap();
//!
//! let report = run_project(&settings).unwrap();
//! report.validate().unwrap();
//!
//! if let Some(result) = &report.result {
//! 	write_outputs(result, &output_target(&settings)).unwrap();
//! }
//! ```

pub use collector::*;
pub use config::*;
pub use converter::*;
pub use error::*;
pub use headings::*;
pub use lines::*;
pub use links::*;
pub use project::*;
pub use switch::*;
pub use wrapper::*;
pub use writer::*;

mod collector;
pub mod config;
mod converter;
#[allow(unused_assignments)]
mod error;
mod headings;
mod lines;
mod links;
pub mod paths;
mod project;
mod switch;
mod wrapper;
mod writer;

#[cfg(test)]
mod __fixtures;
