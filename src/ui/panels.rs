use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::{Dataset, Indicator, RangeFilter, YearSelection};
use crate::state::{AppState, SetField, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // The handle keeps the dataset readable while the widgets mutate `state`.
    let dataset = state.dataset_handle();
    if dataset.is_empty() {
        ui.label("No records loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_selector(ui, state, &dataset);
            ui.separator();

            let membership = [
                (SetField::Region, "Region", dataset.regions()),
                (SetField::Subregion, "Subregion", dataset.subregions()),
                (SetField::Country, "Country", dataset.countries()),
            ];
            for (field, label, values) in membership {
                if !values.is_empty() {
                    member_filter(ui, state, field, label, values);
                }
            }
            ui.separator();

            ui.strong("Ranges");
            for indicator in dataset.indicators() {
                range_filter(ui, state, &dataset, indicator);
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
            if let Some(warning) = &state.filter_warning {
                ui.label(RichText::new(warning).color(Color32::RED));
            }
        });
}

fn year_selector(ui: &mut Ui, state: &mut AppState, dataset: &Dataset) {
    let mut selected = state.criteria().year;
    let text = match selected {
        YearSelection::All => "All years".to_string(),
        YearSelection::Exact(year) => year.to_string(),
    };

    ui.strong("Year");
    egui::ComboBox::from_id_salt("year")
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut selected, YearSelection::All, "All years");
            for &year in dataset.years().iter().rev() {
                ui.selectable_value(&mut selected, YearSelection::Exact(year), year.to_string());
            }
        });
    state.set_year(selected);
}

fn member_filter(
    ui: &mut Ui,
    state: &mut AppState,
    field: SetField,
    label: &str,
    values: &BTreeSet<String>,
) {
    let n_total = values.len();
    let n_selected = state.selection(field).map_or(n_total, |set| set.len());
    let header_text = format!("{label}  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(label)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(field);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(field);
                }
            });

            for value in values {
                let mut text = RichText::new(value);
                if field == SetField::Region {
                    text = text.color(state.region_colors.color_for(Some(value.as_str())));
                }
                let mut checked = state.is_selected(field, value);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_member(field, value);
                }
            }
        });
}

/// Checkbox enabling the range plus a min/max pair bounded by the data.
fn range_filter(ui: &mut Ui, state: &mut AppState, dataset: &Dataset, indicator: Indicator) {
    let Some((lo, hi)) = dataset.bounds(indicator) else {
        return;
    };
    let current = state.criteria().range(indicator).copied();
    let mut enabled = current.is_some();
    let mut range = current.unwrap_or(RangeFilter::new(lo, hi));

    ui.checkbox(&mut enabled, indicator.label());
    if enabled {
        let speed = ((hi - lo) / 200.0).max(0.01);
        ui.horizontal(|ui: &mut Ui| {
            ui.add(
                egui::DragValue::new(&mut range.min)
                    .range(lo..=hi)
                    .speed(speed)
                    .prefix("min "),
            );
            ui.add(
                egui::DragValue::new(&mut range.max)
                    .range(lo..=hi)
                    .speed(speed)
                    .prefix("max "),
            );
        });
    }
    state.set_range(indicator, enabled.then_some(range));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} visible",
            state.dataset().len(),
            state.visible_count()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).italics());
        }
    });
}

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export visible rows")
        .set_file_name(state.config.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("Failed to export {}: {e}", path.display());
        }
    }
}
