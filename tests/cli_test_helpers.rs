#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity
#![allow(dead_code)] // Shared across test binaries; not every binary uses every helper

use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::prelude::*;

use std::path::{Path, PathBuf};
use std::process::Command;

/// Test environment with a real git repository and a dedicated depot
/// directory, both inside one temporary directory.
pub struct CliTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub depot_dir: assert_fs::fixture::ChildPath,
    temp_dir: TempDir,
}

impl CliTestEnvironment {
    /// Creates a new test environment with an initialized repository on a
    /// `main` branch with one commit.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directories
    /// - Failed to initialize or configure the git repository
    /// - Failed to create the initial commit
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("test_repo");
        let depot_dir = temp_dir.child("depot");

        repo_dir.create_dir_all()?;
        depot_dir.create_dir_all()?;
        Self::init_repo(&repo_dir)?;

        Ok(Self {
            repo_dir,
            depot_dir,
            temp_dir,
        })
    }

    /// Initializes a second repository sharing the same depot, for
    /// cross-repository namespacing tests.
    pub fn init_second_repo(&self) -> Result<assert_fs::fixture::ChildPath> {
        let repo_dir = self.temp_dir.child("other_repo");
        repo_dir.create_dir_all()?;
        Self::init_repo(&repo_dir)?;
        Ok(repo_dir)
    }

    fn init_repo(repo_dir: &assert_fs::fixture::ChildPath) -> Result<()> {
        Self::git_in(repo_dir.path(), &["init"])?;
        Self::git_in(repo_dir.path(), &["config", "user.name", "Test User"])?;
        Self::git_in(repo_dir.path(), &["config", "user.email", "test@example.com"])?;
        Self::git_in(repo_dir.path(), &["config", "commit.gpgsign", "false"])?;

        repo_dir.child("README.md").write_str("# Test Repo\n")?;
        Self::git_in(repo_dir.path(), &["add", "."])?;
        Self::git_in(repo_dir.path(), &["commit", "-m", "Initial commit"])?;

        // Ensure we have a main branch (some git versions default to 'master')
        Self::git_in(repo_dir.path(), &["branch", "-M", "main"])?;
        Ok(())
    }

    /// Runs a git command in the given directory, returning trimmed stdout.
    pub fn git_in(dir: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            anyhow::bail!(
                "Git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Runs a git command in the main test repository.
    pub fn git(&self, args: &[&str]) -> Result<String> {
        Self::git_in(self.repo_dir.path(), args)
    }

    /// Writes a file and commits it inside the given checkout.
    pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) -> Result<()> {
        std::fs::write(dir.join(name), content)?;
        Self::git_in(dir, &["add", "."])?;
        Self::git_in(dir, &["commit", "-m", message])?;
        Ok(())
    }

    /// A CLI command rooted in the main test repository, with the depot
    /// pointed at this environment's depot directory.
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        self.run_command_in(self.repo_dir.path(), args)
    }

    /// A CLI command rooted in an arbitrary directory (e.g. a second repo).
    pub fn run_command_in(&self, dir: &Path, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("wtd").context("Failed to find wtd binary")?;
        cmd.current_dir(dir)
            .env("WTD_DEPOT", self.depot_dir.path())
            .args(args);
        Ok(cmd)
    }

    /// The depot path the tool derives for a worktree of the main repository.
    pub fn worktree_path(&self, name: &str) -> Result<PathBuf> {
        self.worktree_path_in(self.repo_dir.path(), name)
    }

    /// The depot path the tool derives for a worktree of the repository at
    /// `dir`, using the same identity math as the binary.
    pub fn worktree_path_in(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let root = PathBuf::from(Self::git_in(dir, &["rev-parse", "--show-toplevel"])?);
        Ok(wtd::depot::worktree_path(self.depot_dir.path(), &root, name))
    }
}
