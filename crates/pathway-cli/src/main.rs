mod app;
mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pathway_router::{AppOptions, RouterConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pathway")]
#[command(version, about = "Pathway CLI - drive the client-side router from a terminal", long_about = None)]
struct Cli {
    /// Router config file (defaults to ./pathway.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log router internals (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the page for a path
    Render {
        /// Path to open, e.g. /info/42?x=y
        path: String,

        #[command(flatten)]
        router: RouterArgs,
    },

    /// Open the first path, then follow each next one with goto
    Walk {
        /// Paths to visit in order
        #[arg(required = true)]
        paths: Vec<String>,

        #[command(flatten)]
        router: RouterArgs,
    },

    /// List registered routes in match order
    Routes,
}

/// Flags overriding the config file
#[derive(Args, Clone, Default)]
pub struct RouterArgs {
    /// Route on the location fragment instead of the path
    #[arg(long)]
    hash: bool,

    /// Template rendered when no route matches
    #[arg(short, long)]
    default: Option<String>,

    /// Render route failures instead of exiting
    #[arg(long)]
    show_errors: bool,

    /// Neutralize <script> tags in route output
    #[arg(long)]
    sanitize: bool,
}

impl RouterArgs {
    fn into_options(self, config: RouterConfig) -> AppOptions {
        let mut options = config.into_options();
        if self.hash {
            options.hash = true;
        }
        if let Some(default) = self.default {
            options.default = Some(default);
        }
        if self.show_errors {
            options = options.with_error(|err| format!("<pre class=\"error\">{}</pre>", err));
        }
        if self.sanitize {
            options = options.with_sanitizer(|html| html.replace("<script", "&lt;script"));
        }
        options
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RouterConfig> {
    match path {
        Some(path) => RouterConfig::load(path),
        None => RouterConfig::load_or_default("pathway.toml"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    // Execute command
    match cli.command {
        Commands::Render { path, router } => {
            commands::render::execute(router.into_options(config), &path).await?;
        }
        Commands::Walk { paths, router } => {
            commands::walk::execute(router.into_options(config), &paths).await?;
        }
        Commands::Routes => {
            commands::routes::execute(config.into_options())?;
        }
    }

    Ok(())
}
