mod config;
mod engine;
mod error;
mod model;
mod ui;
mod worker;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Eldritch V2")
            .with_inner_size([480.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Eldritch V2",
        options,
        Box::new(|cc| Ok(ui::app::boot(&cc.egui_ctx))),
    )
}
