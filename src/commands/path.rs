use anyhow::Result;

use crate::args::ParsedArgs;
use crate::depot;

use super::Workspace;

/// Prints the computed worktree path and nothing else.
///
/// Purely derivational: no existence check, no filesystem access. Shell
/// integrations rely on the bare-path output (`cd "$(wtd path feat)"`).
///
/// # Errors
/// Returns an error if no worktree name was given.
pub fn run(workspace: &Workspace, args: &ParsedArgs) -> Result<()> {
    let Some(name) = args.operand(0) else {
        anyhow::bail!("missing worktree name\nusage: wtd path <name>");
    };

    let worktree_path = depot::worktree_path(&workspace.depot, &workspace.root, name);
    println!("{}", worktree_path.display());

    Ok(())
}
