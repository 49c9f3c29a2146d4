use anyhow::{Context, Result};
use pathway_router::AppOptions;

pub async fn execute(options: AppOptions, path: &str) -> Result<()> {
    let (router, host) = super::open(options, path)?;

    let outcome = router
        .start()
        .await
        .with_context(|| format!("Failed to render {}", path))?;

    super::print_page(path, &outcome, &host);
    Ok(())
}
