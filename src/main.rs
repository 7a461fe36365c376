mod app;
mod color;
mod config;
mod data;
mod pages;
mod state;
mod ui;

use app::SalesDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match DashboardConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid dashboard configuration: {e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SalesDashboardApp::new(&config)))),
    )
}
