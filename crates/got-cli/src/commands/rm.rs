use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct RmArgs {
    /// Only remove from the index, keep the worktree file
    #[arg(long)]
    cached: bool,

    /// Files to remove
    #[arg(value_name = "path", required = true)]
    paths: Vec<PathBuf>,
}

pub fn run(args: &RmArgs) -> Result<i32> {
    let repo = open_repo()?;
    got_repository::remove(&repo, &args.paths, !args.cached)?;
    Ok(0)
}
