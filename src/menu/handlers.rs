use crate::component::pipeline::PipelineController;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use log::warn;
use rust_i18n::t;
use std::path::{Path, PathBuf};

pub fn run_set_watch_directory(
    term: &Term,
    controller: &PipelineController,
    config: &mut Config,
) -> Result<()> {
    term.clear_screen()?;
    println!("{}", style(t!("watch.title")).cyan().bold());

    let Some(input_path) = prompt_watch_directory(config)? else {
        return Ok(()); // ESC pressed
    };

    match controller.set_watch_directory(&PathBuf::from(&input_path)) {
        Ok(report) => {
            let root = controller
                .watched_directory()
                .map_or_else(|| input_path.clone(), |d| d.root().display().to_string());

            config.settings.watch_directory = Some(root.clone());
            add_recent_path(&mut config.settings, &root);
            if let Err(e) = save_settings(&config.settings) {
                warn!("無法儲存設定: {e}");
            }

            println!(
                "\n{} {}",
                style(t!("watch.now_watching")).green(),
                style(&root).bold()
            );
            println!(
                "{}",
                t!(
                    "watch.backlog_summary",
                    submitted = report.submitted,
                    skipped = report.skipped,
                    failed = report.failed
                )
            );
        }
        Err(e) => eprintln!("{} {e:#}", style(t!("common.error")).red().bold()),
    }

    pause(term)?;
    Ok(())
}

fn prompt_watch_directory(config: &Config) -> Result<Option<String>> {
    let recent_paths = &config.settings.recent_paths;

    if recent_paths.is_empty() {
        return prompt_new_path();
    }

    let mut options: Vec<String> = recent_paths
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let indicator = if Path::new(p).is_dir() { "✓" } else { "✗" };
            format!("{} [{}] {}", i + 1, indicator, p)
        })
        .collect();
    options.push(t!("watch.new_path").to_string());

    println!("{}", style(t!("common.esc_hint")).dim());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("watch.select_prompt"))
        .items(&options)
        .default(0)
        .interact_opt()?;

    match selection {
        None => Ok(None),
        Some(idx) if idx < recent_paths.len() => Ok(Some(recent_paths[idx].clone())),
        Some(_) => prompt_new_path(),
    }
}

fn prompt_new_path() -> Result<Option<String>> {
    let path: String = Input::new()
        .with_prompt(t!("watch.input_prompt"))
        .allow_empty(true)
        .interact_text()?;
    let path = path.trim();
    Ok((!path.is_empty()).then(|| path.to_string()))
}

pub fn run_list_catalog(term: &Term, controller: &PipelineController) -> Result<()> {
    term.clear_screen()?;
    println!("{}", style(t!("catalog.title")).cyan().bold());

    match controller.list_videos() {
        Ok(entries) if entries.is_empty() => {
            println!("{}", style(t!("catalog.empty")).yellow());
        }
        Ok(entries) => {
            println!();
            for entry in &entries {
                println!(
                    "  {}  {}  {}",
                    style(&entry.length).cyan(),
                    style(&entry.name).bold(),
                    style(t!("catalog.thumbnail_count", count = entry.thumbnails.len())).dim()
                );
            }
            println!(
                "\n{}",
                style(t!("catalog.total", count = entries.len())).green()
            );
        }
        Err(e) => eprintln!("{} {e:#}", style(t!("common.error")).red().bold()),
    }

    pause(term)?;
    Ok(())
}

pub fn run_remove_video(term: &Term, controller: &PipelineController) -> Result<()> {
    term.clear_screen()?;
    println!("{}", style(t!("remove.title")).cyan().bold());

    let entries = match controller.list_videos() {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("{} {e:#}", style(t!("common.error")).red().bold());
            pause(term)?;
            return Ok(());
        }
    };

    if entries.is_empty() {
        println!("{}", style(t!("catalog.empty")).yellow());
        pause(term)?;
        return Ok(());
    }

    println!("{}", style(t!("common.esc_hint")).dim());
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let Some(selection) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("remove.select_prompt"))
        .items(&names)
        .default(0)
        .interact_opt()?
    else {
        return Ok(());
    };

    let name = names[selection];
    let confirmed = Confirm::new()
        .with_prompt(t!("remove.confirm", name = name))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("{}", style(t!("common.cancelled")).yellow());
        pause(term)?;
        return Ok(());
    }

    match controller.remove_video(name) {
        Ok(_) => println!("{}", style(t!("remove.done", name = name)).green()),
        Err(e) => eprintln!("{} {e:#}", style(t!("common.error")).red().bold()),
    }

    pause(term)?;
    Ok(())
}

pub fn run_show_status(term: &Term, controller: &PipelineController) -> Result<()> {
    term.clear_screen()?;
    println!("{}", style(t!("status.title")).cyan().bold());
    println!();

    let watching = controller.watched_directory().map_or_else(
        || t!("status.not_watching").to_string(),
        |d| d.root().display().to_string(),
    );
    println!("  {} {}", style(t!("status.directory")).dim(), watching);

    let stats = controller.stats();
    println!("  {} {}", style(t!("status.pending")).dim(), controller.pending());
    println!("  {} {}", style(t!("status.submitted")).dim(), stats.submitted);
    println!(
        "  {} {}",
        style(t!("status.duplicates")).dim(),
        stats.duplicates_skipped
    );
    println!("  {} {}", style(t!("status.kept")).dim(), stats.kept);
    println!("  {} {}", style(t!("status.discarded")).dim(), stats.discarded);
    println!(
        "  {} {}",
        style(t!("status.removed_after_failure")).dim(),
        stats.removed_after_failure
    );
    println!(
        "  {} {}",
        style(t!("status.frames_written")).dim(),
        stats.frames_written
    );

    pause(term)?;
    Ok(())
}
