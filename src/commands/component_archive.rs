use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::descriptor::template::parse_template_var;
use crate::descriptor::{add_resources, AddResourcesRequest, ResourceSource, TemplateVar};

#[derive(Args)]
pub struct ComponentArchiveArgs {
    #[command(subcommand)]
    pub command: ComponentArchiveCommand,
}

#[derive(Subcommand)]
pub enum ComponentArchiveCommand {
    /// Manage the resources of a component archive
    #[command(visible_aliases = ["resource", "res", "r"])]
    Resources(ResourcesArgs),
}

#[derive(Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Subcommand)]
pub enum ResourcesCommand {
    /// Add resources to the component descriptor, replacing resources with the
    /// same name, version and type. Also reads resources from stdin unless it
    /// is a terminal.
    Add(AddArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Component archive directory containing component-descriptor.yaml
    pub archive_dir: PathBuf,

    /// YAML file with one or more resources (ignored if it does not exist)
    pub resources: Option<PathBuf>,

    /// Template variables, substituted for ${NAME} before parsing
    #[arg(last = true, value_name = "NAME=VALUE", value_parser = parse_template_var)]
    pub vars: Vec<TemplateVar>,
}

pub fn run(args: ComponentArchiveArgs) -> Result<()> {
    match args.command {
        ComponentArchiveCommand::Resources(resources) => match resources.command {
            ResourcesCommand::Add(add) => run_add(add),
        },
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let mut request = AddResourcesRequest::new(&args.archive_dir)
        .vars(args.vars.into_iter().collect());

    match args.resources {
        Some(path) if path.is_file() => request = request.source(ResourceSource::File(path)),
        Some(path) => eprintln!(
            "{} {} is not a file, skipping",
            style("warning:").yellow().bold(),
            path.display()
        ),
        None => {}
    }

    if !io::stdin().is_terminal() {
        request = request.source(ResourceSource::Stdin);
    }

    let report = add_resources(&request)?;

    let sources = if request.sources.is_empty() {
        "no sources".to_string()
    } else {
        request
            .sources
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!(
        "{} Added {} resource(s) to {} ({} replaced, from {})",
        style("✓").green(),
        report.delta(),
        request.descriptor_path().display(),
        report.replaced,
        sources
    );
    if report.processed.is_empty() {
        println!("{}", style("  No resources supplied").dim());
    }
    for identity in &report.processed {
        println!("{}", style(format!("  {}", identity)).dim());
    }

    Ok(())
}
