use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct TagArgs {
    /// Create an annotated tag object instead of a lightweight ref
    #[arg(short = 'a')]
    annotate: bool,

    /// The tag message (annotated tags only)
    #[arg(short, long, default_value = "")]
    message: String,

    /// The tag name; with no name, list existing tags
    #[arg(value_name = "name")]
    name: Option<String>,

    /// The object to tag
    #[arg(value_name = "object", default_value = "HEAD")]
    object: String,
}

pub fn run(args: &TagArgs) -> Result<i32> {
    let repo = open_repo()?;

    let Some(name) = &args.name else {
        if args.annotate {
            bail!("a tag name is required with -a");
        }
        for (name, _id) in got_repository::list_tags(&repo)? {
            println!("{name}");
        }
        return Ok(0);
    };

    got_repository::create_tag(&repo, name, &args.object, args.annotate, &args.message)?;
    Ok(0)
}
