use eframe::egui::{self, ScrollArea};

use crate::state::{AppState, Tab};
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            ui.separator();
            panels::tab_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.tab {
                    Tab::Overview => tabs::overview(ui, &mut self.state),
                    Tab::Map => tabs::world_map(ui, &mut self.state),
                    Tab::Trends => tabs::trends(ui, &mut self.state),
                    Tab::Correlation => tabs::correlation(ui, &mut self.state),
                    Tab::Regression => tabs::regression(ui, &mut self.state),
                    Tab::About => tabs::about(ui, &mut self.state),
                });
        });
    }
}
