use anyhow::{Context as _, Result};
use std::path::Path;

use super::Context;

pub fn copy_into(ctx: &Context, project: &str, path: &Path) -> Result<()> {
    let buffalo = ctx.open()?;
    let project = buffalo
        .project(project)
        .with_context(|| format!("Unknown project: {}", project))?;

    let target = project
        .copy_to_project(path)
        .with_context(|| format!("Failed to copy {}", path.display()))?;

    println!("✓ Copied to {}", target.display());
    Ok(())
}

pub fn move_into(ctx: &Context, project: &str, path: &Path) -> Result<()> {
    let buffalo = ctx.open()?;
    let project = buffalo
        .project(project)
        .with_context(|| format!("Unknown project: {}", project))?;

    let target = project
        .move_to_project(path)
        .with_context(|| format!("Failed to move {}", path.display()))?;

    println!("✓ Moved to {}", target.display());
    Ok(())
}
