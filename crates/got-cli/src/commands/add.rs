use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct AddArgs {
    /// Files or directories to stage
    #[arg(value_name = "path", required = true)]
    paths: Vec<PathBuf>,
}

pub fn run(args: &AddArgs) -> Result<i32> {
    let repo = open_repo()?;
    got_repository::add(&repo, &args.paths)?;
    Ok(0)
}
