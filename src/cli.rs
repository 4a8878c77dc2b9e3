use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input macro script
    pub input: PathBuf,
    /// Output directory
    pub output: PathBuf,
    /// JSON object of button name -> code, replacing the built-in table
    #[arg(long)]
    pub keys: Option<PathBuf>,
    /// Base name of the written files (defaults to the input file stem)
    #[arg(long)]
    pub name: Option<String>,
    /// Log the resolved controller state of this frame
    #[arg(long)]
    pub frame: Option<u64>,
    /// Log filter, e.g. `info` or `padmacro=debug` (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}
