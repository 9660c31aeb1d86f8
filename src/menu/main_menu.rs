use crate::component::pipeline::PipelineController;
use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::{
    run_list_catalog, run_remove_video, run_set_watch_directory, run_show_status,
};
use crate::tools::default_worker_count;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
    controller: &PipelineController,
) -> Result<bool> {
    if shutdown_signal.load(Ordering::SeqCst) {
        return Ok(false);
    }

    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    match controller.watched_directory() {
        Some(directory) => println!(
            "{} {}",
            style(t!("main_menu.watching")).dim(),
            directory.root().display()
        ),
        None => println!("{}", style(t!("main_menu.not_watching")).yellow()),
    }
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_watch"),
        t!("main_menu.opt_catalog"),
        t!("main_menu.opt_remove"),
        t!("main_menu.opt_status"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_set_watch_directory(term, controller, config)?;
            Ok(true)
        }
        Some(1) => {
            run_list_catalog(term, controller)?;
            Ok(true)
        }
        Some(2) => {
            run_remove_video(term, controller)?;
            Ok(true)
        }
        Some(3) => {
            run_show_status(term, controller)?;
            Ok(true)
        }
        Some(4) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        _ => Ok(false), // 離開或按下 ESC
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_language"),
            t!("settings.opt_workers"),
            t!("settings.opt_settle"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_language_menu(term, config)?,
            Some(1) => show_worker_count_menu(term, config)?,
            Some(2) => show_settle_menu(term, config)?,
            _ => break,
        }
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = Language::all();
    let items: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];
    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            selected_lang
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}

/// 處理執行緒數量（重新啟動後生效）
fn show_worker_count_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.workers.title")).cyan().bold());
    println!(
        "{}",
        style(t!("settings.workers.hint", default = default_worker_count())).dim()
    );

    let worker_count: usize = Input::new()
        .with_prompt(t!("settings.workers.prompt"))
        .default(config.settings.worker_count)
        .interact_text()?;

    if worker_count != config.settings.worker_count {
        config.settings.worker_count = worker_count;
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            style(t!("settings.restart_required")).dim()
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}

/// 新檔案靜置時間（重新啟動後生效）
fn show_settle_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.settle.title")).cyan().bold());
    println!("{}", style(t!("settings.settle.hint")).dim());

    let settle_millis: u64 = Input::new()
        .with_prompt(t!("settings.settle.prompt"))
        .default(config.settings.settle_millis)
        .interact_text()?;

    if settle_millis != config.settings.settle_millis {
        config.settings.settle_millis = settle_millis;
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            style(t!("settings.restart_required")).dim()
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
