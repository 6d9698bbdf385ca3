pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inkwell")]
#[command(about = "Edit and publish blog posts backed by a GitHub repository")]
pub struct Args {
    /// Path to the inkwell config directory (defaults to ~/.inkwell)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Work against a local directory instead of the configured repository
    #[arg(long, global = true)]
    pub local_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
