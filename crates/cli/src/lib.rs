mod class;
mod inspect;
mod resource;
mod session;
mod view;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use unitloader_core::LoaderConfig;

#[derive(Parser)]
#[command(
    name = "unitloader",
    version,
    about = "Resolve classes and resources of a deployed unit",
    long_about = "Unitloader builds the layered resolver of an exploded unit directory: the unit's \
                  own root and its declared classpath first, then host roots, then extension roots. \
                  Every command drives the resolver through its full lifecycle."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Default)]
pub struct GlobalArgs {
    /// Loader configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory or archive added to the host scope; may be repeated
    #[arg(long = "host", global = true, value_name = "PATH")]
    pub hosts: Vec<PathBuf>,

    /// Also write logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// The `--config` file (or defaults) with `--host` paths appended.
    pub fn load_config(&self) -> anyhow::Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => LoaderConfig::default(),
        };
        config.host_roots.extend(self.hosts.iter().cloned());
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the extracted classpath and the composed delegation chain
    Inspect {
        #[arg(value_name = "UNIT_DIR")]
        unit: PathBuf,
    },
    /// Resolve a class by its fully-qualified name
    Class {
        #[arg(value_name = "UNIT_DIR")]
        unit: PathBuf,
        /// Dot-separated class name, e.g. com.example.Main
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Resolve a resource by its path
    Resource {
        #[arg(value_name = "UNIT_DIR")]
        unit: PathBuf,
        #[arg(value_name = "NAME")]
        name: String,
        /// Print every location in chain order instead of the first
        #[arg(long)]
        all: bool,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.global.load_config()?;
    let _guard = unitloader_core::logging::init_logging("cli", &config.logging, cli.global.verbose);

    match cli.command {
        Commands::Inspect { unit } => inspect::run(&config, unit),
        Commands::Class { unit, name } => class::run(&config, unit, &name),
        Commands::Resource { unit, name, all } => resource::run(&config, unit, &name, all),
    }
}
