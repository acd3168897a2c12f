use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use got_repository::Repository;

#[derive(Args)]
pub struct InitArgs {
    /// Where to create the repository (default: current directory)
    #[arg(value_name = "path")]
    path: Option<PathBuf>,
}

pub fn run(args: &InitArgs) -> Result<i32> {
    let path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let repo = Repository::init(&path)?;
    println!(
        "Initialized empty repository in {}",
        repo.git_dir().display()
    );
    Ok(0)
}
