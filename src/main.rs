use std::sync::Arc;

use anyhow::Context;
use eframe::egui;

use happiness_dashboard::app::DashboardApp;
use happiness_dashboard::config::{self, Config};
use happiness_dashboard::data::{self, DataSource};
use happiness_dashboard::geo::WorldMap;
use happiness_dashboard::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load().unwrap_or_else(|e| {
        log::warn!("{e}; using default settings");
        Config::default()
    });

    let dataset = DataSource::from_path(&config.data_source)
        .and_then(|source| data::load(&source))
        .inspect_err(|e| log::error!("Failed to load data: {e}"))
        .with_context(|| format!("loading {}", config.data_source.display()))?;

    let world_map = match WorldMap::load(&config.world_boundaries) {
        Ok(map) => Some(map),
        Err(e) => {
            log::warn!("Map data is not available: {e}");
            None
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let state = AppState::new(Arc::new(dataset), config, world_map);
    eframe::run_native(
        "Global Happiness Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
