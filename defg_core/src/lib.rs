//! `defg_core` is the engine behind [defg](https://github.com/defg-docs/defg),
//! which keeps a hand-edited README in sync with documentation comments
//! (`//** ...` or `##** ...`) scattered across source files.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source files
//!   → Project scanner (walks the tree, honors .gitignore / skip / src / extensions)
//!   → Source scanner (groups consecutive documentation lines into Docblocks)
//!   → Permutation search (orders the docblocks, branch-and-bound)
//!   → Differ (incremental line-wise alignment against the README)
//!   → Reconciliation (tagged operations → merged README + preview)
//! ```
//!
//! The README may contain content that never appears in the source: images,
//! lone HTML tags and `<div class="insert-block">` regions. These are carried
//! through untouched as [`OperationKind::Fresh`].
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `defg.toml`.
//! - [`project`]: Directory walking and docblock discovery.
//! - [`source_scanner`]: Extraction of documentation lines from source text.
//!
//! ## Key Types
//!
//! - [`Docblock`]: A non-empty run of documentation lines; the unit that gets
//!   reordered.
//! - [`Differ`]: Resumable line-wise aligner with bounded lookahead.
//! - [`Search`]: Exhaustive, greedy or seeded permutation search.
//! - [`Reconciliation`]: The best ordering's operations, distance and stats.
//!
//! ## Quick Start
//!
//! ```rust
//! use defg_core::Docblock;
//! use defg_core::ReconcileOptions;
//! use defg_core::reconcile;
//!
//! let docblocks = vec![
//! 	Docblock::new(["## Usage", "Run it."])?,
//! 	Docblock::new(["# Title"])?,
//! ];
//! let readme = "# Title\n\n![logo](logo.png)\n\n## Usage\nRun it.\n";
//!
//! let result = reconcile(&docblocks, readme, &ReconcileOptions::default());
//! assert_eq!(result.distance, 0);
//! assert_eq!(result.merged_text(), readme.trim_end());
//! # Ok::<(), defg_core::DefgError>(())
//! ```

pub use classify::*;
pub use config::*;
pub use differ::*;
pub use docblock::*;
pub use error::*;
pub use operation::*;
pub use project::*;
pub use reconcile::*;
pub use search::*;
pub use source_scanner::*;

mod classify;
pub mod config;
mod differ;
mod docblock;
#[allow(unused_assignments)]
mod error;
mod operation;
pub mod project;
mod reconcile;
mod search;
pub mod source_scanner;

#[cfg(test)]
mod __fixtures;
