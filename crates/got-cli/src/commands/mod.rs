pub mod add;
pub mod cat_file;
pub mod check_ignore;
pub mod checkout;
pub mod commit;
pub mod hash_object;
pub mod init;
pub mod log;
pub mod ls_files;
pub mod ls_tree;
pub mod rev_parse;
pub mod rm;
pub mod show_ref;
pub mod status;
pub mod tag;

use anyhow::Result;
use clap::Subcommand;
use got_repository::Repository;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository
    Init(init::InitArgs),
    /// Add file contents to the index
    Add(add::AddArgs),
    /// Remove files from the index (and the worktree)
    Rm(rm::RmArgs),
    /// Show the working tree status
    Status(status::StatusArgs),
    /// Record changes to the repository
    Commit(commit::CommitArgs),
    /// Display the history of a commit as a Graphviz digraph
    Log(log::LogArgs),
    /// Provide content, type, or size of repository objects
    CatFile(cat_file::CatFileArgs),
    /// Compute object ID and optionally create a blob from a file
    HashObject(hash_object::HashObjectArgs),
    /// List staged files
    LsFiles(ls_files::LsFilesArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Resolve a name to an object id
    RevParse(rev_parse::RevParseArgs),
    /// List references
    ShowRef(show_ref::ShowRefArgs),
    /// Check out a commit or tree into an empty directory
    Checkout(checkout::CheckoutArgs),
    /// Create or list tags
    Tag(tag::TagArgs),
    /// Check paths against ignore rules
    CheckIgnore(check_ignore::CheckIgnoreArgs),
}

/// Open the repository containing the current directory.
pub fn open_repo() -> Result<Repository> {
    Ok(Repository::discover(".")?)
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Add(args) => add::run(args),
        Commands::Rm(args) => rm::run(args),
        Commands::Status(args) => status::run(args),
        Commands::Commit(args) => commit::run(args),
        Commands::Log(args) => log::run(args),
        Commands::CatFile(args) => cat_file::run(args),
        Commands::HashObject(args) => hash_object::run(args),
        Commands::LsFiles(args) => ls_files::run(args),
        Commands::LsTree(args) => ls_tree::run(args),
        Commands::RevParse(args) => rev_parse::run(args),
        Commands::ShowRef(args) => show_ref::run(args),
        Commands::Checkout(args) => checkout::run(args),
        Commands::Tag(args) => tag::run(args),
        Commands::CheckIgnore(args) => check_ignore::run(args),
    }
}
