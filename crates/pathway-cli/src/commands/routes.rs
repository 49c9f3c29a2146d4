use anyhow::Result;
use colored::Colorize;
use pathway_router::AppOptions;

pub fn execute(options: AppOptions) -> Result<()> {
    let mode = if options.hash { "hash" } else { "path" };
    let (router, _host) = super::open(options, "/")?;

    println!("{} ({} routing)", "Routes".green().bold(), mode.cyan());
    println!();
    for (idx, route) in router.routes().iter().enumerate() {
        let preview = route.template().trim().lines().next().unwrap_or_default();
        println!("  {}. {:<12} {}", idx + 1, route.pattern().bold(), preview.dimmed());
    }

    if let Some(default) = &router.options().default {
        println!();
        println!("  default: {}", default.dimmed());
    }

    Ok(())
}
