use anyhow::Result;
use clap::Args;
use got_object::ObjectKind;
use got_repository::find;

use super::open_repo;

#[derive(Args)]
pub struct RevParseArgs {
    /// The expected object kind (blob, tree, commit, tag)
    #[arg(long = "type", value_name = "kind")]
    kind: Option<ObjectKind>,

    /// The name to resolve
    #[arg(value_name = "name")]
    name: String,
}

pub fn run(args: &RevParseArgs) -> Result<i32> {
    let repo = open_repo()?;
    let id = find(&repo, &args.name, args.kind, true)?;
    println!("{id}");
    Ok(0)
}
