use std::path::Path;

use crate::git::{CommandOutput, GitError};

/// Capability interface over the git binary, so command logic can be
/// exercised against a scripted fake instead of a real checkout.
pub trait GitRunner {
    /// Runs `git <args>` in `cwd`, capturing trimmed stdout/stderr.
    ///
    /// Probing call sites that expect failure pass `quiet = true` to keep the
    /// captured output off the console.
    ///
    /// # Errors
    /// Returns [`GitError::CommandFailed`] on a nonzero exit (after echoing
    /// the captured output to stderr when not quiet), or
    /// [`GitError::Spawn`] when the binary could not be started at all.
    fn run(&self, cwd: &Path, args: &[&str], quiet: bool) -> Result<CommandOutput, GitError>;
}
