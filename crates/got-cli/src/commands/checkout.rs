use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CheckoutArgs {
    /// The commit or tree to check out
    #[arg(value_name = "commit")]
    commit: String,

    /// The empty directory to check out into
    #[arg(value_name = "path")]
    path: PathBuf,
}

pub fn run(args: &CheckoutArgs) -> Result<i32> {
    let repo = open_repo()?;
    got_repository::checkout(&repo, &args.commit, &args.path)?;
    Ok(0)
}
