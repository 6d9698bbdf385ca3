// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Init, Login, Logout, Post, Whoami};
use tracing_subscriber::EnvFilter;

command_enum! {
    (Init, Init),
    (Login, Login),
    (Logout, Logout),
    (Post, Post),
    (Whoami, Whoami),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let ctx = cli::op::OpContext::new(args.config_path, args.local_root);

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
