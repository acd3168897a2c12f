use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use got_repository::find;

use super::open_repo;

#[derive(Args)]
pub struct CatFileArgs {
    /// Show the object's type instead of its content
    #[arg(short = 't', conflicts_with = "size")]
    kind: bool,

    /// Show the object's size instead of its content
    #[arg(short = 's')]
    size: bool,

    /// The object to show
    #[arg(value_name = "object")]
    object: String,
}

pub fn run(args: &CatFileArgs) -> Result<i32> {
    let repo = open_repo()?;
    let id = find(&repo, &args.object, None, true)?;
    let obj = repo.odb().read(&id)?;

    if args.kind {
        println!("{}", obj.kind());
        return Ok(0);
    }

    let payload = obj.serialize_payload();
    if args.size {
        println!("{}", payload.len());
        return Ok(0);
    }

    io::stdout().write_all(&payload)?;
    Ok(0)
}
