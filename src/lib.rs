//! # wtd
//!
//! A CLI tool for managing git worktrees in a centralized depot outside the
//! primary repository, so experimental branches don't pollute the main
//! working tree or trigger ignore-file churn.
//!
//! ## Features
//!
//! - **Centralized Storage** - Worktrees live in `~/.worktrees/<repo-identity>/<name>/`
//! - **Collision-Safe Namespacing** - Repository identity combines the directory
//!   basename with a short fingerprint of the absolute path
//! - **Apply Back** - Reconcile a worktree's changes into the main repository by
//!   merge, rebase, patch, or direct branch switch
//! - **Git Is the Source of Truth** - No state of its own; every durable fact
//!   lives in git's repository metadata
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a worktree for feature development
//! wtd new feature-auth
//!
//! # List worktrees, print a worktree's path
//! wtd list
//! wtd path feature-auth
//!
//! # Bring the changes back into the main checkout
//! wtd apply feature-auth --target main
//!
//! # Remove the worktree when done
//! wtd rm feature-auth
//! ```
//!
//! ## Module Structure
//!
//! - [`args`] - Command-line tokenization into positionals and flags
//! - [`commands`] - Individual command implementations (new, list, path, rm, apply, prune)
//! - [`depot`] - Depot layout: repository identity and worktree path derivation
//! - [`git`] - Invocation of the git binary and typed helpers over it
//! - [`traits`] - Defines the GitRunner trait for testability and abstraction

pub mod args;
pub mod commands;
pub mod depot;
pub mod git;
pub mod traits;

pub use anyhow::Result;
