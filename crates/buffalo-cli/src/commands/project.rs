use anyhow::{Context as _, Result};
use buffalo_core::NextWork;

use super::Context;

pub fn create_project(ctx: &Context, name: &str) -> Result<()> {
    let mut buffalo = ctx.open()?;
    let project = buffalo
        .create_project(name)
        .with_context(|| format!("Failed to create project {}", name))?;

    println!("✓ Project {} ({} works)", project.name(), project.works().len());
    if let Some(path) = project.project_file() {
        println!("  in {}", path.display());
    }
    Ok(())
}

pub fn list_projects(ctx: &Context) -> Result<()> {
    let buffalo = ctx.open()?;

    if buffalo.projects().is_empty() {
        println!("No projects in {}", buffalo.base_dir().display());
        println!("\nRun `buffalo create <name>` to create one.");
        return Ok(());
    }

    for (folder, project) in buffalo.projects() {
        let marker = if project.is_all_done() { "✓" } else { " " };
        println!(
            "{} {} [{}/{} done]",
            marker,
            folder,
            project.done_count(),
            project.works().len()
        );
    }
    Ok(())
}

pub fn show_project(ctx: &Context, name: &str) -> Result<()> {
    let buffalo = ctx.open()?;
    let project = buffalo
        .project(name)
        .with_context(|| format!("Unknown project: {}", name))?;

    print!("{}", project);
    Ok(())
}

pub fn show_next(ctx: &Context) -> Result<()> {
    let buffalo = ctx.open()?;

    for (folder, project) in buffalo.projects() {
        match project.get_next_not_started_work() {
            NextWork::Ready(work) => println!("{}: {} is ready", folder, work.name),
            NextWork::Blocked(work) => {
                let current = project
                    .get_current_work()
                    .map_or_else(|| String::from("previous work"), |w| w.name.clone());
                println!("{}: {} is waiting for {}", folder, work.name, current);
            }
            NextWork::Exhausted if project.is_all_done() => println!("{}: all done", folder),
            NextWork::Exhausted => println!("{}: no work left to start", folder),
        }
    }
    Ok(())
}
