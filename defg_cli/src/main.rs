use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use defg_cli::Commands;
use defg_cli::DefgCli;
use defg_cli::OutputFormat;
use defg_core::DefgConfig;
use defg_core::DefgError;
use defg_core::Docblock;
use defg_core::Operation;
use defg_core::OperationKind;
use defg_core::ReconcileOptions;
use defg_core::Reconciliation;
use defg_core::ScanOptions;
use defg_core::normalize_extensions;
use defg_core::reconcile;
use defg_core::scan_docblocks;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

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
	($text:expr,blue) => {
		if color_enabled() {
			format!("{}", $text.blue())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,magenta) => {
		if color_enabled() {
			format!("{}", $text.magenta())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,grey) => {
		if color_enabled() {
			format!("{}", $text.bright_black())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,struck) => {
		if color_enabled() {
			format!("{}", $text.red().strikethrough())
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

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "DEFG_LOG";

fn main() {
	let args = DefgCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
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

	let result = match args.command {
		Some(Commands::Update { dry_run }) => run_update(&args, dry_run),
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `defg --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<DefgError>() {
			Ok(defg_err) => {
				let report: miette::Report = (*defg_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr, filtered by `DEFG_LOG` when set. Defaults to warnings, or
/// debug output with `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_ansi(use_color)
				.with_target(false),
		)
		.try_init()
		.ok();
}

fn resolve_root(args: &DefgCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Everything a command needs: the extracted docblocks, where the README
/// lives, and the reconciliation tunables after applying command-line
/// overrides to the config file.
struct Project {
	root: PathBuf,
	readme_path: PathBuf,
	docblocks: Vec<Docblock>,
	options: ReconcileOptions,
}

impl Project {
	fn readme_display(&self) -> String {
		make_relative(&self.readme_path, &self.root)
	}
}

fn load_project(args: &DefgCli) -> Result<Project, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DefgConfig::load(&root)?;

	let mut scan_options = ScanOptions::from_config(config.as_ref());
	if !args.src.is_empty() {
		scan_options.src.clone_from(&args.src);
	}
	if !args.skip.is_empty() {
		scan_options.skip.clone_from(&args.skip);
	}
	if !args.extensions.is_empty() {
		scan_options.extensions = normalize_extensions(&args.extensions);
	}

	let config = config.unwrap_or_default();
	let mut options = config.reconcile_options();
	if let Some(strategy) = args.requested_strategy() {
		options.strategy = strategy;
	}
	if args.max_steps.is_some() {
		options.max_steps = args.max_steps;
	}

	let readme_path = match &args.readme {
		Some(readme) => root.join(readme),
		None => config.readme_path(&root),
	};

	tracing::debug!(
		root = %root.display(),
		readme = %readme_path.display(),
		"resolved project"
	);

	let docblocks = scan_docblocks(&root, &scan_options)?;
	if docblocks.is_empty() {
		return Err(DefgError::NoDocblocks(root.display().to_string()).into());
	}

	if args.verbose {
		println!(
			"Scanned project: {} docblock(s), strategy {:?}",
			docblocks.len(),
			options.strategy
		);
	}

	Ok(Project {
		root,
		readme_path,
		docblocks,
		options,
	})
}

/// Read the README. A missing file is an empty document.
fn read_readme(path: &Path) -> Result<String, DefgError> {
	match std::fs::read_to_string(path) {
		Ok(content) => Ok(content),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
		Err(e) => Err(DefgError::Io(e)),
	}
}

/// The README content `defg update` writes for a reconciliation.
fn expected_readme(result: &Reconciliation<'_>) -> String {
	let merged = result.merged_text();
	if merged.is_empty() {
		merged
	} else {
		format!("{merged}\n")
	}
}

fn run_update(args: &DefgCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let project = load_project(args)?;
	let current = read_readme(&project.readme_path)?;
	let result = reconcile(&project.docblocks, &current, &project.options);
	let expected = expected_readme(&result);
	let readme = project.readme_display();

	print_preview(&result.operations);
	println!();
	warn_if_not_optimal(&project, &result);

	if args.verbose {
		println!(
			"Ordering {:?} at distance {} ({} alignment(s), {} pruned)",
			result.order, result.distance, result.stats.alignments, result.stats.pruned
		);
	}

	if result.matches_document(&current) {
		println!("{readme} is already up to date.");
		return Ok(());
	}

	let counts = result.counts();
	if dry_run {
		println!(
			"Dry run: would update {readme} ({} line(s) added, {} line(s) removed).",
			counts.added, counts.removed
		);
		return Ok(());
	}

	std::fs::write(&project.readme_path, expected).map_err(DefgError::Io)?;
	println!(
		"Updated {readme} ({} line(s) added, {} line(s) removed).",
		counts.added, counts.removed
	);

	Ok(())
}

/// Exits with status 1 when `defg update` would change the README.
fn run_check(
	args: &DefgCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let project = load_project(args)?;
	let current = read_readme(&project.readme_path)?;
	let result = reconcile(&project.docblocks, &current, &project.options);
	let readme = project.readme_display();
	let is_stale = !result.matches_document(&current);
	let counts = result.counts();

	match format {
		OutputFormat::Json => {
			let output = serde_json::json!({
				"ok": !is_stale,
				"readme": readme,
				"distance": result.distance,
				"optimal": result.optimal,
				"order": result.order,
				"counts": {
					"unchanged": counts.unchanged,
					"added": counts.added,
					"removed": counts.removed,
					"fresh": counts.fresh,
				},
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			warn_if_not_optimal(&project, &result);

			if is_stale {
				let report: miette::Report = DefgError::StaleReadme(readme).into();
				eprintln!("{report:?}");
				eprintln!("  lines added: {}", counts.added);
				eprintln!("  lines removed: {}", counts.removed);

				if show_diff {
					eprintln!();
					print_diff(&current, &expected_readme(&result));
				}
			} else {
				println!("Check passed: {readme} is up to date.");
			}
		}
	}

	if is_stale {
		process::exit(1);
	}

	Ok(())
}

fn run_list(args: &DefgCli) -> Result<(), Box<dyn std::error::Error>> {
	let project = load_project(args)?;

	println!("{}", colored!("Docblocks:", bold));
	for (index, docblock) in project.docblocks.iter().enumerate() {
		let origin = docblock
			.origin()
			.map(|origin| {
				format!(
					"{}:{}",
					make_relative(&origin.file, &project.root),
					origin.line
				)
			})
			.unwrap_or_default();
		let first_line = docblock.first().map_or("", String::as_str);
		println!(
			"  [{index}] {origin} {} ({} line(s))",
			colored!(first_line, bold),
			docblock.len()
		);
	}

	println!("\n{} docblock(s)", project.docblocks.len());

	Ok(())
}

fn warn_if_not_optimal(project: &Project, result: &Reconciliation<'_>) {
	if project.options.max_steps.is_some() && !result.optimal {
		eprintln!(
			"{} step budget reached; the chosen ordering may not be the best one",
			colored!("warning:", yellow)
		);
	}
}

/// Print every operation with its marker, colored by kind.
fn print_preview(operations: &[Operation<'_>]) {
	for operation in operations {
		let text = operation.to_string();
		let line = match operation.kind {
			OperationKind::Unchanged => colored!(text, grey),
			OperationKind::Added => colored!(text, blue),
			OperationKind::Removed => colored!(text, struck),
			OperationKind::Fresh => colored!(text, magenta),
		};
		println!("{line}");
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		let text = change.to_string_lossy();
		let newline = if text.ends_with('\n') { "" } else { "\n" };
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}{newline}", colored!(format!("-{text}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}{newline}", colored!(format!("+{text}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {text}{newline}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
