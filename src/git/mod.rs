//! Invocation of the git binary.
//!
//! Every durable fact this tool touches (worktree registrations, branches,
//! diffs) lives in git's own repository metadata, and every mutation happens
//! by spawning `git` as a child process. The [`Git`] wrapper provides typed
//! helpers over a [`GitRunner`] so the command layer never assembles raw
//! argument vectors and the test suite can substitute a scripted fake.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::traits::GitRunner;

/// Captured output of a finished git invocation, trimmed of surrounding
/// whitespace.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Structured failure from the git invocation layer.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(std::io::Error),
    #[error("`git {command}` exited with code {code}")]
    CommandFailed {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },
}

impl GitError {
    /// The stderr git produced, when this failure carries any.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// Production runner: spawns the real `git` binary.
pub struct SystemGit;

impl GitRunner for SystemGit {
    fn run(&self, cwd: &Path, args: &[&str], quiet: bool) -> Result<CommandOutput, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(GitError::Spawn)?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(1);
            if !quiet {
                if !stdout.is_empty() {
                    eprintln!("{stdout}");
                }
                if !stderr.is_empty() {
                    eprintln!("{stderr}");
                }
            }
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                code,
                stdout,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

/// Typed helpers over a [`GitRunner`].
pub struct Git<'a> {
    runner: &'a dyn GitRunner,
}

impl<'a> Git<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn GitRunner) -> Self {
        Self { runner }
    }

    /// Runs git in `cwd`, returning trimmed stdout. On failure the captured
    /// output has already been echoed to stderr by the runner.
    ///
    /// # Errors
    /// Returns an error if git exits nonzero or cannot be spawned.
    pub fn run(&self, cwd: &Path, args: &[&str]) -> Result<String> {
        Ok(self.runner.run(cwd, args, false)?.stdout)
    }

    /// Probe variant: failures stay off the console and come back as `Err`
    /// for the caller to interpret.
    ///
    /// # Errors
    /// Returns the structured [`GitError`] on any failure.
    pub fn run_quiet(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutput, GitError> {
        self.runner.run(cwd, args, true)
    }

    /// Resolves the repository root containing `start`.
    ///
    /// # Errors
    /// Returns an error if `start` is not inside a git repository.
    pub fn top_level(&self, start: &Path) -> Result<PathBuf> {
        let output = self
            .run_quiet(start, &["rev-parse", "--show-toplevel"])
            .map_err(|_| anyhow!("not inside a git repository: {}", start.display()))?;
        Ok(PathBuf::from(output.stdout))
    }

    /// Whether a local branch with this name exists. A quiet probe; any
    /// failure reads as "no".
    #[must_use]
    pub fn branch_exists(&self, root: &Path, branch: &str) -> bool {
        let refname = format!("refs/heads/{branch}");
        self.run_quiet(root, &["rev-parse", "--verify", "--quiet", &refname])
            .is_ok()
    }

    /// The branch currently checked out in `dir`, or `None` when HEAD is
    /// detached.
    #[must_use]
    pub fn current_branch(&self, dir: &Path) -> Option<String> {
        self.run_quiet(dir, &["symbolic-ref", "--quiet", "--short", "HEAD"])
            .ok()
            .map(|output| output.stdout)
    }

    /// Whether `dir` has no staged or unstaged changes. Untracked files count
    /// as dirty.
    ///
    /// # Errors
    /// Returns an error if the status query itself fails.
    pub fn is_clean(&self, dir: &Path) -> Result<bool> {
        Ok(self.run(dir, &["status", "--porcelain"])?.is_empty())
    }

    /// Merge base of two refs, or `None` when the probe fails (diverged or
    /// missing history).
    #[must_use]
    pub fn merge_base(&self, dir: &Path, a: &str, b: &str) -> Option<String> {
        self.run_quiet(dir, &["merge-base", a, b])
            .ok()
            .map(|output| output.stdout)
    }

    /// Checks out a ref in `dir`.
    ///
    /// # Errors
    /// Returns an error if the checkout fails.
    pub fn checkout(&self, dir: &Path, refname: &str) -> Result<()> {
        self.run(dir, &["checkout", refname])?;
        Ok(())
    }

    /// Detaches HEAD in `dir`, releasing whatever branch it held.
    ///
    /// # Errors
    /// Returns an error if the checkout fails.
    pub fn detach_head(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["checkout", "--detach"])?;
        Ok(())
    }

    /// `git worktree add --detach <path> <base>`: no branch involved.
    ///
    /// # Errors
    /// Returns an error if worktree creation fails.
    pub fn worktree_add_detached(&self, root: &Path, path: &Path, base: &str) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(root, &["worktree", "add", "--detach", &path, base])
            .context("failed to create worktree")?;
        Ok(())
    }

    /// `git worktree add <path> <branch>`: checks an existing branch out.
    ///
    /// # Errors
    /// Returns an error if worktree creation fails (e.g. the branch is
    /// already checked out elsewhere).
    pub fn worktree_add_existing(&self, root: &Path, path: &Path, branch: &str) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(root, &["worktree", "add", &path, branch])
            .context("failed to create worktree")?;
        Ok(())
    }

    /// `git worktree add <path> -b <branch> <base>`: creates the branch.
    ///
    /// # Errors
    /// Returns an error if worktree or branch creation fails.
    pub fn worktree_add_new_branch(
        &self,
        root: &Path,
        path: &Path,
        branch: &str,
        base: &str,
    ) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(root, &["worktree", "add", &path, "-b", branch, base])
            .context("failed to create worktree")?;
        Ok(())
    }

    /// Unregisters a worktree, optionally forcing through local changes.
    ///
    /// # Errors
    /// Returns an error if git refuses the removal.
    pub fn worktree_remove(&self, root: &Path, path: &Path, force: bool) -> Result<()> {
        let path = path.to_string_lossy();
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(&path);
        self.run(root, &args).context("failed to remove worktree")?;
        Ok(())
    }

    /// Human-readable `git worktree list` output.
    ///
    /// # Errors
    /// Returns an error if the listing fails.
    pub fn worktree_list(&self, root: &Path) -> Result<String> {
        self.run(root, &["worktree", "list"])
    }

    /// Machine-readable worktree listing (`--porcelain`).
    ///
    /// # Errors
    /// Returns an error if the listing fails.
    pub fn worktree_list_porcelain(&self, root: &Path) -> Result<String> {
        self.run(root, &["worktree", "list", "--porcelain"])
    }

    /// Drops stale worktree registrations.
    ///
    /// # Errors
    /// Returns an error if the prune fails.
    pub fn worktree_prune(&self, root: &Path) -> Result<()> {
        self.run(root, &["worktree", "prune"])?;
        Ok(())
    }

    /// Force-deletes a local branch. Quiet: the caller decides whether a
    /// failure matters.
    ///
    /// # Errors
    /// Returns the structured [`GitError`] on failure (e.g. branch checked
    /// out elsewhere).
    pub fn branch_delete(&self, root: &Path, branch: &str) -> Result<(), GitError> {
        self.run_quiet(root, &["branch", "-D", branch]).map(|_| ())
    }

    /// Merges `branch` into the checkout at `dir`.
    ///
    /// # Errors
    /// Returns an error if the merge fails (e.g. conflicts).
    pub fn merge(&self, dir: &Path, branch: &str, no_ff: bool) -> Result<()> {
        let mut args = vec!["merge"];
        if no_ff {
            args.push("--no-ff");
        }
        args.push(branch);
        self.run(dir, &args)?;
        Ok(())
    }

    /// Fast-forward-only merge; fails loudly rather than silently diverging.
    ///
    /// # Errors
    /// Returns an error if the merge is not a strict fast-forward.
    pub fn merge_ff_only(&self, dir: &Path, branch: &str) -> Result<()> {
        self.run(dir, &["merge", "--ff-only", branch])?;
        Ok(())
    }

    /// Rebases the checkout at `dir` onto `onto`.
    ///
    /// # Errors
    /// Returns an error if the rebase stops (e.g. conflicts).
    pub fn rebase(&self, dir: &Path, onto: &str) -> Result<()> {
        self.run(dir, &["rebase", onto])?;
        Ok(())
    }

    /// Diff of committed work from `base` to HEAD.
    ///
    /// # Errors
    /// Returns an error if the diff fails.
    pub fn diff_range(&self, dir: &Path, base: &str) -> Result<String> {
        self.run(dir, &["diff", base, "HEAD"])
    }

    /// Staged (index) diff.
    ///
    /// # Errors
    /// Returns an error if the diff fails.
    pub fn diff_staged(&self, dir: &Path) -> Result<String> {
        self.run(dir, &["diff", "--cached"])
    }

    /// Unstaged (working tree) diff.
    ///
    /// # Errors
    /// Returns an error if the diff fails.
    pub fn diff_unstaged(&self, dir: &Path) -> Result<String> {
        self.run(dir, &["diff"])
    }

    /// Applies a patch file into both the index and the working tree. Quiet:
    /// the caller surfaces git's diagnostic on rejection.
    ///
    /// # Errors
    /// Returns the structured [`GitError`] carrying git's stderr verbatim.
    pub fn apply_index(&self, root: &Path, patch: &Path) -> Result<(), GitError> {
        let patch = patch.to_string_lossy();
        self.run_quiet(root, &["apply", "--index", &patch]).map(|_| ())
    }

    /// Commits whatever is staged with the given message.
    ///
    /// # Errors
    /// Returns an error if the commit fails.
    pub fn commit(&self, root: &Path, message: &str) -> Result<()> {
        self.run(root, &["commit", "-m", message])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Scripted fake: maps a joined argument line to canned stdout or a
    /// canned exit code.
    struct ScriptedGit {
        responses: HashMap<String, Result<String, i32>>,
    }

    impl ScriptedGit {
        fn new(entries: &[(&str, Result<&str, i32>)]) -> Self {
            let responses = entries
                .iter()
                .map(|(args, result)| {
                    let result = match result {
                        Ok(stdout) => Ok((*stdout).to_string()),
                        Err(code) => Err(*code),
                    };
                    ((*args).to_string(), result)
                })
                .collect();
            Self { responses }
        }
    }

    impl GitRunner for ScriptedGit {
        fn run(&self, _cwd: &Path, args: &[&str], _quiet: bool) -> Result<CommandOutput, GitError> {
            let command = args.join(" ");
            match self.responses.get(&command) {
                Some(Ok(stdout)) => Ok(CommandOutput {
                    stdout: stdout.clone(),
                    stderr: String::new(),
                }),
                Some(Err(code)) => Err(GitError::CommandFailed {
                    command,
                    code: *code,
                    stdout: String::new(),
                    stderr: "scripted failure".to_string(),
                }),
                None => Err(GitError::CommandFailed {
                    command,
                    code: 1,
                    stdout: String::new(),
                    stderr: "unscripted command".to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_current_branch_is_none_when_detached() {
        let runner = ScriptedGit::new(&[("symbolic-ref --quiet --short HEAD", Err(1))]);
        let git = Git::new(&runner);

        assert_eq!(git.current_branch(Path::new("/repo")), None);
    }

    #[test]
    fn test_current_branch_returns_branch_name() {
        let runner = ScriptedGit::new(&[("symbolic-ref --quiet --short HEAD", Ok("main"))]);
        let git = Git::new(&runner);

        assert_eq!(git.current_branch(Path::new("/repo")), Some("main".to_string()));
    }

    #[test]
    fn test_branch_exists_maps_probe_outcome_to_bool() {
        let runner = ScriptedGit::new(&[
            ("rev-parse --verify --quiet refs/heads/feat", Ok("abc123")),
            ("rev-parse --verify --quiet refs/heads/gone", Err(1)),
        ]);
        let git = Git::new(&runner);

        assert!(git.branch_exists(Path::new("/repo"), "feat"));
        assert!(!git.branch_exists(Path::new("/repo"), "gone"));
    }

    #[test]
    fn test_merge_base_is_none_on_probe_failure() {
        let runner = ScriptedGit::new(&[("merge-base main feat", Err(128))]);
        let git = Git::new(&runner);

        assert_eq!(git.merge_base(Path::new("/repo"), "main", "feat"), None);
    }

    #[test]
    fn test_top_level_failure_names_the_path() {
        let runner = ScriptedGit::new(&[("rev-parse --show-toplevel", Err(128))]);
        let git = Git::new(&runner);

        let result = git.top_level(Path::new("/nowhere"));
        assert!(matches!(result, Err(ref e) if e.to_string().contains("not inside a git repository")));
    }

    #[test]
    fn test_is_clean_reads_empty_status() {
        let runner = ScriptedGit::new(&[("status --porcelain", Ok(""))]);
        let git = Git::new(&runner);

        assert!(matches!(git.is_clean(Path::new("/repo")), Ok(true)));
    }

    #[test]
    fn test_command_failed_carries_command_and_code() {
        let runner = ScriptedGit::new(&[]);
        let git = Git::new(&runner);

        let err = match git.run_quiet(Path::new("/repo"), &["merge", "--ff-only", "feat"]) {
            Err(err) => err,
            Ok(_) => unreachable!("unscripted command should fail"),
        };
        assert!(err.to_string().contains("merge --ff-only feat"));
        assert!(matches!(err, GitError::CommandFailed { code: 1, .. }));
    }
}
