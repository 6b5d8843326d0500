//! # Spectree
//!
//! A behavior-driven test specification engine. Tests are declared as a tree of named
//! `describe` contexts holding `it` examples and `before_each`/`after_each` hooks. The engine
//! walks the tree, applies skip/only filters, focus markers and break-on-failure, classifies
//! every outcome and streams lifecycle events to a pluggable reporter.
//!
//! ## Module Structure
//!
//! - **`tree`**: `Suite`, `Scope` and the registered context tree
//! - **`engine`**: traversal, hook ordering and outcome classification
//! - **`policy`**: the per-example run/skip/abort decision
//! - **`reporter`**: event protocol, shared aggregation and the built-in flavors
//! - **`output`**: failure formatters, colorizers and the styled writer
//! - **`cli`** / **`config`**: command-line and YAML configuration of a run
//! - **`assertion`** / **`errors`**: assertion failures and recorded failure values
//! - **`logging`**: `tracing` subscriber setup

pub use crate::assertion::AssertionFailure;
pub use crate::config::RunConfig;
pub use crate::engine::{run, Outcome, RunSummary};
pub use crate::errors::{FailureRecord, RecordedFailure, SpecError};
pub use crate::output::{Colorizer, FailureFormatter};
pub use crate::policy::{Decision, Markers, RunPolicy};
pub use crate::reporter::{Aggregator, Reporter, ReporterKind};
pub use crate::tree::{Scope, Suite};

pub mod assertion;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod output;
pub mod policy;
pub mod reporter;
pub mod tree;
