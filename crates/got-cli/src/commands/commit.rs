use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CommitArgs {
    /// The commit message
    #[arg(short, long, required = true)]
    message: String,
}

pub fn run(args: &CommitArgs) -> Result<i32> {
    let repo = open_repo()?;
    let id = got_repository::commit(&repo, &args.message)?;

    let location = repo
        .current_branch()?
        .unwrap_or_else(|| "detached HEAD".to_string());
    let hex = id.to_hex();
    let summary = args.message.trim().lines().next().unwrap_or("");
    println!("[{location} {}] {summary}", &hex[..7]);
    Ok(0)
}
