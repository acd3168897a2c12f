use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use got_object::ObjectKind;
use got_odb::ObjectStore;

use super::open_repo;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Read the object from stdin
    #[arg(long)]
    stdin: bool,

    /// Actually write the object into the object database
    #[arg(short = 'w')]
    write: bool,

    /// Object kind
    #[arg(short = 't', default_value = "blob", value_name = "kind")]
    kind: ObjectKind,

    /// Files to hash
    #[arg(value_name = "file")]
    files: Vec<PathBuf>,
}

pub fn run(args: &HashObjectArgs) -> Result<i32> {
    // A repository is only needed when writing.
    let repo = if args.write { Some(open_repo()?) } else { None };

    let mut payloads = Vec::new();
    if args.stdin {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        payloads.push(data);
    }
    for file in &args.files {
        payloads.push(std::fs::read(file)?);
    }

    for payload in &payloads {
        let id = match &repo {
            Some(repo) => repo.odb().write_raw(args.kind, payload)?,
            None => ObjectStore::hash(args.kind, payload)?,
        };
        println!("{id}");
    }

    Ok(0)
}
