pub mod render;
pub mod routes;
pub mod walk;

use anyhow::Result;
use colored::Colorize;
use pathway_router::{AppOptions, Dispatch, MemoryHost, Router};
use std::sync::Arc;

use crate::app;

/// Builds the demo application on an in-memory host opened at `path`
pub fn open(options: AppOptions, path: &str) -> Result<(Router, Arc<MemoryHost>)> {
    let host = Arc::new(if options.hash {
        MemoryHost::with_fragment(path)
    } else {
        MemoryHost::new(path)
    });
    let router = Router::new(options, host.clone())?;
    app::register(&router)?;
    Ok((router, host))
}

/// Prints one rendered page with its outcome and bound links
pub fn print_page(path: &str, outcome: &Dispatch, host: &MemoryHost) {
    let label = match outcome {
        Dispatch::Rendered { pattern } => format!("route {}", pattern).green(),
        Dispatch::Default => "default template".yellow(),
        Dispatch::ErrorRendered { pattern } => format!("error in {}", pattern).red(),
        Dispatch::Superseded => "superseded".dimmed(),
    };

    println!("{} {} ({})", "→".cyan().bold(), path.bold(), label);
    println!("{}", host.html().trim());

    let links = host.links();
    if !links.is_empty() {
        println!("{} {}", "links:".dimmed(), links.join(", "));
    }
    println!();
}
