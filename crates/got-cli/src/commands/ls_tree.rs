use anyhow::{bail, Result};
use bstr::{BString, ByteSlice};
use clap::Args;
use got_object::{Object, ObjectKind, Tree};
use got_repository::{find, Repository};

use super::open_repo;

#[derive(Args)]
pub struct LsTreeArgs {
    /// Recurse into sub-trees
    #[arg(short = 'r')]
    recursive: bool,

    /// A tree-ish object (commits peel to their tree)
    #[arg(value_name = "tree-ish")]
    tree: String,
}

pub fn run(args: &LsTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let id = find(&repo, &args.tree, Some(ObjectKind::Tree), true)?;
    let tree = read_tree(&repo, &id)?;
    print_tree(&repo, &tree, BString::from(""), args.recursive)?;
    Ok(0)
}

fn read_tree(repo: &Repository, id: &got_hash::ObjectId) -> Result<Tree> {
    match repo.odb().read(id)? {
        Object::Tree(tree) => Ok(tree),
        other => bail!("{id} is a {}, not a tree", other.kind()),
    }
}

fn print_tree(repo: &Repository, tree: &Tree, prefix: BString, recursive: bool) -> Result<()> {
    for leaf in tree.iter() {
        let kind = if leaf.mode.is_tree() {
            ObjectKind::Tree
        } else if leaf.mode.is_gitlink() {
            ObjectKind::Commit
        } else {
            ObjectKind::Blob
        };

        let mut path = prefix.clone();
        if !path.is_empty() {
            path.push(b'/');
        }
        path.extend_from_slice(&leaf.name);

        if recursive && kind == ObjectKind::Tree {
            let subtree = read_tree(repo, &leaf.id)?;
            print_tree(repo, &subtree, path, recursive)?;
        } else {
            println!("{:06o} {} {}\t{}", leaf.mode.raw(), kind, leaf.id, path.as_bstr());
        }
    }
    Ok(())
}
