//! Individual command implementations.
//!
//! Each command is a short linear sequence of git calls with branch points on
//! precondition checks; nothing spans multiple invocations. Commands receive
//! the resolved [`Workspace`] explicitly rather than reading the current
//! directory or environment themselves, so they stay deterministic under
//! test.

use std::path::PathBuf;

pub mod apply;
pub mod list;
pub mod new;
pub mod path;
pub mod prune;
pub mod rm;

/// Resolved ambient state for one invocation: the repository root and the
/// depot directory.
pub struct Workspace {
    pub root: PathBuf,
    pub depot: PathBuf,
}
