use clap::Parser;
use std::path::PathBuf;

use crate::config::{HeaderPolicy, Pass};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rewrites C source into C++ idioms")]
pub struct Cli {
    /// C source file to convert
    pub input: PathBuf,
    /// Where to write the converted file
    pub output: PathBuf,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pass to leave out (repeatable)
    #[arg(long = "skip", value_enum)]
    pub skip: Vec<Pass>,

    /// When to add the C++ headers a pass needs
    #[arg(long, value_enum)]
    pub headers: Option<HeaderPolicy>,

    /// Do not append `// converted from …` comments
    #[arg(long)]
    pub no_provenance: bool,
}
