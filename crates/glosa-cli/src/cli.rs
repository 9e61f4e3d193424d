use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "glosa",
    about = "Merge translated HTML files with their original-language counterparts",
    version,
)]
pub struct Cli {
    /// Working directory containing `source` and `target` subdirectories.
    /// Merged files are written to an `output` subdirectory alongside them.
    pub path: Option<PathBuf>,

    /// Print each merged document to stdout after writing it.
    #[arg(short, long)]
    pub verbose: bool,
}
