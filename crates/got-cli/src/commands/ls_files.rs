use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct LsFilesArgs {
    /// Show entry details as well as names
    #[arg(long)]
    verbose: bool,
}

pub fn run(args: &LsFilesArgs) -> Result<i32> {
    let repo = open_repo()?;
    let index = repo.load_index()?;

    if args.verbose {
        println!(
            "Index file format v2 containing {} entries",
            index.len()
        );
    }

    for entry in index.iter() {
        println!("{}", entry.path);
        if args.verbose {
            println!("  {} with perms: {:o}", entry.mode_type, entry.mode_perms);
            println!("  on blob: {}", entry.id);
            println!(
                "  created: {}.{}, modified: {}.{}",
                entry.stat.ctime_secs,
                entry.stat.ctime_nsecs,
                entry.stat.mtime_secs,
                entry.stat.mtime_nsecs
            );
            println!("  device: {}, inode: {}", entry.stat.dev, entry.stat.ino);
            println!("  user: {}  group: {}", entry.stat.uid, entry.stat.gid);
            println!(
                "  flags: stage={} assume_valid={}",
                entry.stage.as_u8(),
                entry.assume_valid
            );
        }
    }

    Ok(0)
}
