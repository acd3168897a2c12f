use anyhow::Result;
use bstr::BStr;
use clap::Args;

use super::open_repo;
use crate::ignore::IgnoreRules;

#[derive(Args)]
pub struct CheckIgnoreArgs {
    /// Paths to check against the ignore rules
    #[arg(value_name = "path", required = true)]
    paths: Vec<String>,
}

pub fn run(args: &CheckIgnoreArgs) -> Result<i32> {
    let repo = open_repo()?;
    let rules = IgnoreRules::load(&repo)?;

    for path in &args.paths {
        if rules.is_ignored(BStr::new(path.as_str())) {
            println!("{path}");
        }
    }

    Ok(0)
}
