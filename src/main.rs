use anyhow::Result;
use std::path::PathBuf;

use wtd::args::ParsedArgs;
use wtd::commands::{Workspace, apply, list, new, path, prune, rm};
use wtd::depot;
use wtd::git::{Git, SystemGit};

const USAGE: &str = "\
wtd - git worktrees in a centralized depot

Usage:
  wtd new <name> [base] [--branch <name>] [--no-branch]
  wtd list [--all]
  wtd path <name>
  wtd rm [<name>] [--all] [--force] [--delete-branch] [--keep-branch]
  wtd apply <name> [--target <branch>] [--merge|--rebase|--patch|--switch] [--no-ff] [--message <text>]
  wtd prune

Global options:
  --repo <path>    Repository to operate on (default: current directory)
  --depot <path>   Depot directory (default: $WTD_DEPOT or ~/.worktrees)
  -h, --help       Show this help
";

fn main() -> Result<()> {
    let args = ParsedArgs::parse(std::env::args().skip(1));

    let command = args.command().unwrap_or("help");
    if command == "help" || args.flag_bool("help", false) {
        print!("{USAGE}");
        return Ok(());
    }

    let runner = SystemGit;
    let git = Git::new(&runner);

    let start = match args.flag_str("repo") {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    let root = git.top_level(&start)?;
    let depot = depot::resolve_depot(args.flag_str("depot"))?;
    let workspace = Workspace { root, depot };

    match command {
        "new" | "add" => new::run(&git, &workspace, &args),
        "list" => list::run(&git, &workspace, &args),
        "path" => path::run(&workspace, &args),
        "rm" | "remove" => rm::run(&git, &workspace, &args),
        "apply" => apply::run(&git, &workspace, &args),
        "prune" => prune::run(&git, &workspace),
        other => {
            eprint!("{USAGE}");
            anyhow::bail!("unknown command: {other}")
        }
    }
}
