#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

//! Integration tests for the list, path, and prune commands.

use anyhow::Result;
use predicates::prelude::*;

mod cli_test_helpers;
use cli_test_helpers::CliTestEnvironment;

#[test]
fn test_list_shows_native_worktree_listing() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["new", "feat"])?.assert().success();

    env.run_command(&["list"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("feat"));

    Ok(())
}

#[test]
fn test_list_all_resolves_the_same_repository() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["new", "feat"])?.assert().success();

    let scoped = env.run_command(&["list"])?.assert().success();
    let all = env.run_command(&["list", "--all"])?.assert().success();

    // --all is scoped to the same single repository
    assert_eq!(scoped.get_output().stdout, all.get_output().stdout);

    Ok(())
}

#[test]
fn test_path_prints_derived_location_without_existence_check() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    // No worktree named 'ghost' exists; the path is still derivable
    let expected = env.worktree_path("ghost")?;
    env.run_command(&["path", "ghost"])?
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().as_ref()));

    Ok(())
}

#[test]
fn test_path_requires_a_name() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    env.run_command(&["path"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing worktree name"));

    Ok(())
}

#[test]
fn test_prune_drops_stale_registrations() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["new", "feat"])?.assert().success();
    let worktree = env.worktree_path("feat")?;

    // Delete the directory behind git's back; the registration lingers
    std::fs::remove_dir_all(&worktree)?;
    assert!(env.git(&["worktree", "list"])?.contains("feat"));

    env.run_command(&["prune"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Pruned"));

    assert!(!env.git(&["worktree", "list"])?.contains("feat"));

    Ok(())
}
