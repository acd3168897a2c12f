use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use got_repository::{status, BranchState, StagedChange, WorktreeChange};

use super::open_repo;
use crate::ignore::IgnoreRules;

#[derive(Args)]
pub struct StatusArgs {}

pub fn run(_args: &StatusArgs) -> Result<i32> {
    let repo = open_repo()?;
    let report = status(&repo)?;

    match &report.branch {
        BranchState::OnBranch(branch) => println!("On branch {branch}"),
        BranchState::Unborn(branch) => {
            println!("On branch {branch}");
            println!();
            println!("No commits yet");
        }
        BranchState::Detached(id) => println!("HEAD detached at {id}"),
    }

    if !report.staged.is_empty() {
        println!();
        println!("Changes to be committed:");
        for (path, change) in &report.staged {
            let label = match change {
                StagedChange::Added => "added",
                StagedChange::Modified => "modified",
                StagedChange::Deleted => "deleted",
            };
            println!("  {label}: {path}");
        }
    }

    if !report.unstaged.is_empty() {
        println!();
        println!("Changes not staged for commit:");
        for (path, change) in &report.unstaged {
            let label = match change {
                WorktreeChange::Modified => "modified",
                WorktreeChange::Deleted => "deleted",
            };
            println!("  {label}: {path}");
        }
    }

    let rules = IgnoreRules::load(&repo)?;
    let untracked: Vec<_> = report
        .untracked
        .iter()
        .filter(|path| !rules.is_ignored(path.as_bstr()))
        .collect();
    if !untracked.is_empty() {
        println!();
        println!("Untracked files:");
        for path in untracked {
            println!("  {path}");
        }
    }

    Ok(0)
}
