use std::env;
use std::ffi::OsString;

use anyhow::Result;
use clap::{Parser, Subcommand};
use component_cli::commands::{self, component_archive::ComponentArchiveArgs};
use component_cli::config::Settings;
use component_cli::legacy;
use component_cli::router::{route, Route};

#[derive(Parser)]
#[command(
    name = "component-cli",
    version,
    about = "Edit component archives; other commands are forwarded to the legacy component-cli"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Work with a component archive directory
    #[command(name = "component-archive", visible_aliases = ["archive", "ca"])]
    ComponentArchive(ComponentArchiveArgs),
}

fn main() -> Result<()> {
    let settings = Settings::load()?;
    let args: Vec<OsString> = env::args_os().collect();

    match route(&args, settings.force_legacy) {
        Route::AddResources => {
            let cli = Cli::parse_from(args);
            match cli.command {
                Command::ComponentArchive(args) => commands::component_archive::run(args)?,
            }
        }
        Route::Delegate(argv) => match legacy::delegate(&settings.legacy_program, &argv)? {},
    }

    Ok(())
}
