// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! retrace - resolve minified JavaScript stack traces through source maps
//!
//! Reads a stack trace (text or JSON frames) from a file or stdin, resolves
//! every frame against the given source maps and prints the original
//! locations. Logs go to stderr; stdout carries only the result.

mod output;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use retrace_config::{load_config, CliOverrides, LogFormat, LogLevel, LoggingConfig};
use retrace_core::SourceMapDocument;
use retrace_symbolicate::StackResolver;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
	#[default]
	Text,
	Json,
}

/// retrace - map minified stack frames back to original sources
#[derive(Parser, Debug)]
#[command(name = "retrace", version, about, long_about = None)]
struct Args {
	/// Source map file (repeatable; earlier maps win ties)
	#[arg(short, long = "map", value_name = "FILE", required = true)]
	maps: Vec<PathBuf>,

	/// Stack trace file (reads stdin when absent)
	#[arg(short, long, value_name = "FILE")]
	stack: Option<PathBuf>,

	/// Output format
	#[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
	format: OutputFormat,

	/// Path to custom configuration file
	#[arg(short, long, env = "RETRACE_CONFIG")]
	config: Option<PathBuf>,

	/// Lines of source context around each resolved line (0 disables)
	#[arg(long, value_name = "N")]
	context_lines: Option<usize>,

	/// Only accept mappings starting exactly at a probed column
	#[arg(long)]
	exact: bool,

	/// Log level (overrides config)
	#[arg(short, long)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long)]
	json_logs: bool,
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		Self {
			log_level: args.log_level.clone(),
			log_format: args.json_logs.then(|| "json".to_string()),
			context_lines: args.context_lines,
			exact_lookup: args.exact.then_some(true),
			config_file: args.config.clone(),
		}
	}
}

fn log_level_to_tracing(level: LogLevel) -> tracing::Level {
	match level {
		LogLevel::Trace => tracing::Level::TRACE,
		LogLevel::Debug => tracing::Level::DEBUG,
		LogLevel::Info => tracing::Level::INFO,
		LogLevel::Warn => tracing::Level::WARN,
		LogLevel::Error => tracing::Level::ERROR,
	}
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(format!("retrace={}", log_level_to_tracing(logging.level)))
	});

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().pretty().with_writer(io::stderr))
				.init();
		}
	}
}

/// Load source maps in command line order.
fn load_documents(paths: &[PathBuf]) -> Result<Vec<SourceMapDocument>> {
	paths
		.iter()
		.map(|path| {
			let bytes = std::fs::read(path)
				.with_context(|| format!("failed to read source map {}", path.display()))?;
			let document = SourceMapDocument::from_slice(document_name(path), &bytes)?;
			debug!(path = %path.display(), digest = %document.digest(), "loaded source map");
			Ok(document)
		})
		.collect()
}

/// Artifact name used for matching: the file name of the map.
fn document_name(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}

fn read_stack(path: Option<&Path>) -> Result<String> {
	match path {
		Some(path) => std::fs::read_to_string(path)
			.with_context(|| format!("failed to read stack trace {}", path.display())),
		None => {
			let mut text = String::new();
			io::stdin()
				.read_to_string(&mut text)
				.context("failed to read stack trace from stdin")?;
			Ok(text)
		}
	}
}

fn main() -> Result<()> {
	let args = Args::parse();

	let config = load_config(CliOverrides::from(&args)).context("failed to load configuration")?;
	init_tracing(&config.logging);

	let documents = load_documents(&args.maps)?;
	let raw = read_stack(args.stack.as_deref())?;

	info!(maps = documents.len(), format = ?args.format, "resolving stack trace");

	let resolver = StackResolver::with_decoder(config.decoder(), config.resolve_options());
	let frames = resolver.resolve_stack(&documents, &raw)?;

	let rules = &resolver.options().path_rules;
	let rendered = match args.format {
		OutputFormat::Text => output::render_text(&frames, rules),
		OutputFormat::Json => {
			let mut json = output::render_json(&frames, rules).context("failed to serialize frames")?;
			json.push('\n');
			json
		}
	};

	io::stdout()
		.lock()
		.write_all(rendered.as_bytes())
		.context("failed to write output")?;

	Ok(())
}
