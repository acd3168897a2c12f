use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct ShowRefArgs {}

pub fn run(_args: &ShowRefArgs) -> Result<i32> {
    let repo = open_repo()?;
    for (name, id) in got_ref::iter_refs(repo.git_dir())? {
        println!("{id} {name}");
    }
    Ok(0)
}
