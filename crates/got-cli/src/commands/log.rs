use std::collections::HashSet;

use anyhow::{bail, Result};
use clap::Args;
use got_hash::ObjectId;
use got_object::Object;
use got_repository::{find, Repository};

use super::open_repo;

#[derive(Args)]
pub struct LogArgs {
    /// Commit to start at
    #[arg(value_name = "commit", default_value = "HEAD")]
    commit: String,
}

/// Emit the ancestry of a commit as a Graphviz digraph, one node per
/// commit and one edge per parent link.
pub fn run(args: &LogArgs) -> Result<i32> {
    let repo = open_repo()?;
    let start = find(&repo, &args.commit, None, true)?;

    println!("digraph gitlog{{");
    println!("  node[shape=rect]");
    let mut seen = HashSet::new();
    walk(&repo, &start, &mut seen)?;
    println!("}}");
    Ok(0)
}

fn walk(repo: &Repository, id: &ObjectId, seen: &mut HashSet<ObjectId>) -> Result<()> {
    if !seen.insert(*id) {
        return Ok(());
    }

    let Object::Commit(commit) = repo.odb().read(id)? else {
        bail!("object {id} is not a commit");
    };

    let hex = id.to_hex();
    let summary = commit.summary().to_string();
    let label = summary.replace('\\', "\\\\").replace('"', "\\\"");
    println!("  c_{hex} [label=\"{}: {label}\"]", &hex[..7]);

    for parent in commit.parents()? {
        println!("  c_{hex} -> c_{};", parent.to_hex());
        walk(repo, &parent, seen)?;
    }
    Ok(())
}
