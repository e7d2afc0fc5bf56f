use anyhow::{Context as _, Result};
use buffalo_core::WorkStatus;

use super::Context;

pub fn find_job(ctx: &Context, work_name: &str, without_check: bool) -> Result<()> {
    let buffalo = ctx.open()?;

    let Some((folder, work)) = buffalo.get_a_job(work_name, without_check) else {
        anyhow::bail!("No project has {} available", work_name);
    };

    println!("project: {}", folder);
    println!("work: {}", work.name);
    println!("status: {}", work.status);
    println!("output_file: {}", work.output_file);
    println!("comment: {}", work.comment);
    Ok(())
}

pub fn set_status(ctx: &Context, project: &str, work_name: &str, status: &str) -> Result<()> {
    let status: WorkStatus = status.parse()?;
    let mut buffalo = ctx.open()?;

    let updated = buffalo
        .update_work_status(project, work_name, status)
        .with_context(|| format!("Failed to update {}/{}", project, work_name))?;

    if !updated {
        anyhow::bail!("Project {} has no work named {}", project, work_name);
    }

    println!("✓ {}/{} is now {}", project, work_name, status);
    Ok(())
}
