use anyhow::Result;
use auto_video_catalog::component::{FfmpegDecoder, PipelineController, PipelineOptions};
use auto_video_catalog::config::Config;
use auto_video_catalog::init;
use auto_video_catalog::menu::show_main_menu;
use auto_video_catalog::signal::setup_shutdown_signal;
use console::{Term, style};
use log::{info, warn};
use rust_i18n::t;
use std::path::Path;
use std::sync::Arc;

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en-US");

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal()?;

    let mut config = Config::new();
    rust_i18n::set_locale(config.settings.language.as_str());

    FfmpegDecoder::check_available()?;

    let options = PipelineOptions::from_settings(&config.settings);
    let controller = PipelineController::new(Arc::new(FfmpegDecoder::default()), options)?;

    // 套用上次的監看資料夾
    if let Some(path) = config.settings.watch_directory.clone() {
        if let Err(e) = controller.set_watch_directory(Path::new(&path)) {
            warn!("無法恢復監看資料夾 {path}: {e:#}");
        }
    }

    loop {
        match show_main_menu(&term, &shutdown_signal, &mut config, &controller) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style(t!("main_menu.error_prefix")).red().bold(), e);
                break;
            }
        }
    }

    controller.shutdown();
    Ok(())
}
