use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use defg_core::Strategy;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Merge documentation comments from your source files into the README.",
	long_about = "defg collects documentation comments (lines marked with `//**` or `##**`) \
	              from your source files and merges them into the README.\n\nThe merge finds \
	              the order of comment blocks that best matches the README you already have, so \
	              hand-added images, HTML tags, blank lines and insert-blocks survive every \
	              update.\n\nQuick start:\n  defg update  Merge the comments into README.md\n  \
	              defg check   Verify the README is up to date\n  defg list    Show every \
	              documentation block"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct DefgCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// README file to reconcile, relative to the project root. Defaults to
	/// the `readme` config value or `README.md`.
	#[arg(long, global = true)]
	pub readme: Option<PathBuf>,

	/// Only scan source files matching this glob. Can be repeated.
	#[arg(long, global = true)]
	pub src: Vec<String>,

	/// Skip files matching this gitignore-style pattern. Can be repeated.
	#[arg(long, global = true)]
	pub skip: Vec<String>,

	/// Source file extensions to scan, e.g. `--ext js,ts`. Can be repeated.
	#[arg(long = "ext", global = true)]
	pub extensions: Vec<String>,

	/// Use the fast greedy ordering instead of the exhaustive search. Same as
	/// `--strategy quick`.
	#[arg(long, global = true, default_value_t = false, conflicts_with = "strategy")]
	pub quick: bool,

	/// How docblock orderings are searched.
	#[arg(long, value_enum, global = true)]
	pub strategy: Option<StrategyArg>,

	/// Stop the exhaustive search after this many alignments and keep the
	/// best ordering found so far.
	#[arg(long, global = true)]
	pub max_steps: Option<usize>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

impl DefgCli {
	/// The strategy requested on the command line, if any.
	pub fn requested_strategy(&self) -> Option<Strategy> {
		if self.quick {
			return Some(Strategy::Quick);
		}

		self.strategy.map(Strategy::from)
	}
}

#[derive(Subcommand)]
pub enum Commands {
	/// Merge the documentation comments into the README.
	///
	/// Extracts every documentation block from the source files, finds the
	/// ordering that best matches the current README, prints a preview of
	/// the changes and writes the merged README. A missing README is created.
	Update {
		/// Print the preview without writing the README.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Check that the README is up to date with the documentation comments.
	///
	/// Exits with status code 1 when `defg update` would change the README.
	/// Ideal for CI pipelines.
	Check {
		/// Show a unified diff between the current and the merged README.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List all documentation blocks in the project.
	///
	/// Displays every block in extraction order with its index, origin and
	/// first line.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
	/// Branch-and-bound over every ordering. Always finds the best one.
	Exhaustive,
	/// Greedy slot-by-slot ordering. Fast, possibly suboptimal.
	Quick,
	/// Greedy ordering used as the starting bound for the exhaustive search.
	Seeded,
}

impl From<StrategyArg> for Strategy {
	fn from(value: StrategyArg) -> Self {
		match value {
			StrategyArg::Exhaustive => Self::Exhaustive,
			StrategyArg::Quick => Self::Quick,
			StrategyArg::Seeded => Self::Seeded,
		}
	}
}
