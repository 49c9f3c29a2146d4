use anyhow::{Context, Result};
use colored::Colorize;
use pathway_router::AppOptions;

/// Starts at the first path and navigates through the rest
///
/// A failed navigation is reported and the walk continues.
pub async fn execute(options: AppOptions, paths: &[String]) -> Result<()> {
    let Some((first, rest)) = paths.split_first() else {
        anyhow::bail!("walk needs at least one path");
    };

    let (router, host) = super::open(options, first)?;
    let outcome = router
        .start()
        .await
        .with_context(|| format!("Failed to render {}", first))?;
    super::print_page(first, &outcome, &host);

    for path in rest {
        match router.goto(path).await {
            Ok(outcome) => super::print_page(path, &outcome, &host),
            Err(err) => {
                println!("{} {} {}", "✗".red().bold(), path.bold(), err.to_string().red());
                println!();
            }
        }
    }

    Ok(())
}
