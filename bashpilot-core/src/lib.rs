//! # bashpilot-core - Runtime for bashpilot
//!
//! `bashpilot-core` powers the bashpilot terminal assistant. It provides the
//! command safety gate that sits between an AI-generated shell command and
//! the terminal that executes it.
//!
//! ## Highlights
//!
//! - **Command Classifier**: pure, deterministic verdict over a generated
//!   command line - privilege-escalation block, infinite-loop detection, and
//!   whitelist/blacklist matching.
//! - **Query Cache**: session-scoped memoization of generated commands so a
//!   repeated query never re-invokes the model.
//! - **Review Workflow**: human-in-the-loop escalation for flagged commands
//!   with edit, optional whitelist promotion, execute, or cancel.
//! - **Execution Dispatcher**: fire-and-forget command dispatch onto its own
//!   Tokio task, with failures converted into inline terminal diagnostics.
//! - **Configuration-First**: flat JSON config plus plain-text command lists
//!   under `~/.bashpilot`, loaded at startup and rewritten wholesale on edit.
//!
//! The crate has no presentation layer: the interactive prompts live in the
//! `bashpilot` binary, so every component here is testable headless.

pub mod cache;
pub mod config;
pub mod exec;
pub mod gate;
pub mod history;
pub mod lists;
pub mod llm;
pub mod review;
pub mod safety;

// Re-exports for convenience
pub use cache::QueryCache;
pub use config::ConfigStore;
pub use exec::{CommandDispatcher, ExecError, ShellSink, TerminalSink};
pub use gate::{GateDecision, SafetyGate};
pub use history::QueryHistory;
pub use lists::{CommandList, CommandLists};
pub use llm::{
    CommandGenerator, GeneratorError, OpenAiCompatibleClient, first_line, generate_or_error,
};
pub use review::{ReviewOutcome, ReviewSession};
pub use safety::{Verdict, classify, command_name, normalize};
