#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod modules;
mod style;

use eframe::egui;
use app::GrayscaleApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("bw_converter=info"),
    )
    .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 680.0])
            .with_min_inner_size([440.0, 420.0])
            .with_title("Grayscale Batch Converter"),
        ..Default::default()
    };
    eframe::run_native(
        "Grayscale Batch Converter",
        options,
        Box::new(|cc| Ok(Box::new(GrayscaleApp::new(cc)))),
    )
}
