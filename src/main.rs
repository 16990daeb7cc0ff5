use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod assets;
mod commands;
mod config;
mod grammar;
mod render;
mod slug;
mod text;
mod transform;
mod util;
mod vault;

#[derive(Parser)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: NotedownCommand,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct RenderArgs {
    /// The markdown file to render
    input: PathBuf,

    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum NotedownCommand {
    /// Build every note in the vault to HTML
    Build(BuildArgs),

    /// Render a single note to stdout
    Render(RenderArgs),
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    match args.command {
        NotedownCommand::Build(args) => {
            commands::build::run(&args)?;
        }
        NotedownCommand::Render(args) => {
            commands::render::run(&args)?;
        }
    }

    Ok(())
}
