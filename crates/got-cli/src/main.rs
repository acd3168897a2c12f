mod commands;
mod ignore;

use std::process;

use clap::Parser;

use commands::Commands;

#[derive(Parser)]
#[command(
    name = "got",
    about = "A content-addressed revision-control store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    match commands::run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("fatal: {err}");
            process::exit(1);
        }
    }
}
