mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::FlatboardApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional data directory: first CLI argument, or ./data when present.
    // An explicitly given directory that fails to load is fatal; without
    // one the app starts empty and data is opened via File → Open.
    let explicit_dir = std::env::args().nth(1).map(PathBuf::from);
    let default_dir = PathBuf::from("data");

    let mut state = AppState::default();
    if let Some(dir) = &explicit_dir {
        match data::loader::load_market_data(dir) {
            Ok(market) => state.set_market_data(market),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", dir.display());
                eprintln!("flatboard: failed to load {}: {e:#}", dir.display());
                std::process::exit(1);
            }
        }
    } else if default_dir.is_dir() {
        match data::loader::load_market_data(&default_dir) {
            Ok(market) => state.set_market_data(market),
            Err(e) => {
                log::warn!("Skipping default data directory: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flatboard – Apartment Listing Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(FlatboardApp::with_state(state)))),
    )
}
