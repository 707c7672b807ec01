use eframe::egui::{self, Color32, RichText, Ui};

use crate::analysis::{
    correlation_matrix, country_history, fit_ols, mean_by_year, rank_groups, Grouping,
};
use crate::data::{Column, Indicator};
use crate::state::AppState;
use crate::ui::{map, plot, table};

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

fn indicator_combo(ui: &mut Ui, id: &str, available: &[Indicator], current: &mut Indicator) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for &indicator in available {
                ui.selectable_value(current, indicator, indicator.label());
            }
        });
}

/// Checkboxes choosing a subset of `available`; the result keeps their order.
/// Returns whether the selection changed.
fn indicator_checkboxes(ui: &mut Ui, available: &[Indicator], chosen: &mut Vec<Indicator>) -> bool {
    let mut changed = false;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for &indicator in available {
            let mut on = chosen.contains(&indicator);
            if ui.checkbox(&mut on, indicator.header()).changed() {
                changed = true;
                if on {
                    chosen.push(indicator);
                } else {
                    chosen.retain(|&i| i != indicator);
                }
            }
        }
    });
    if changed {
        chosen.sort_by_key(|i| available.iter().position(|a| a == i));
    }
    changed
}

fn missing_column(ui: &mut Ui, indicator: Indicator) {
    ui.label(
        RichText::new(format!("The data source has no {} column.", indicator.label()))
            .color(Color32::GRAY),
    );
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtered data");
    table::column_chooser(ui, state);
    table::data_table(ui, state);
    ui.add_space(8.0);

    ui.heading("Summary statistics");
    table::stats_panel(ui, state.summary());
    ui.add_space(8.0);

    let available = state.dataset().indicators();
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Ranking by");
        indicator_combo(ui, "ranking_indicator", &available, &mut state.ranking_indicator);
    });

    let indicator = state.ranking_indicator;
    let view = state.view();
    ui.columns(2, |cols| {
        cols[0].strong(format!("Top {} regions", state.config.top_regions));
        let regions = rank_groups(&view, Grouping::Region, indicator, state.config.top_regions);
        plot::ranking_chart(&mut cols[0], "rank_regions", &regions, indicator, Some(&state.region_colors));

        cols[1].strong(format!("Top {} subregions", state.config.top_subregions));
        let subregions =
            rank_groups(&view, Grouping::Subregion, indicator, state.config.top_subregions);
        plot::ranking_chart(&mut cols[1], "rank_subregions", &subregions, indicator, None);
    });
    ui.add_space(8.0);

    ui.heading("Happiness vs GDP per capita");
    let axes = (Indicator::GdpPerCapita, Indicator::Happiness);
    if state.dataset().has_column(Column::Indicator(axes.0))
        && state.dataset().has_column(Column::Indicator(axes.1))
    {
        plot::region_scatter(ui, "gdp_scatter", &view, axes, &state.region_colors);
    } else {
        missing_column(ui, Indicator::GdpPerCapita);
    }
}

pub fn world_map(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Average happiness by country");
    if !state.dataset().has_column(Column::Indicator(Indicator::Happiness)) {
        missing_column(ui, Indicator::Happiness);
        return;
    }
    let view = state.view();
    map::choropleth(ui, state.world_map.as_ref(), &view, Indicator::Happiness);
}

/// Trends use every year regardless of the sidebar filters.
pub fn trends(ui: &mut Ui, state: &mut AppState) {
    let indicator = Indicator::Happiness;
    if !state.dataset().has_column(Column::Indicator(indicator)) {
        missing_column(ui, indicator);
        return;
    }
    let dataset = state.dataset_handle();

    ui.heading("Mean happiness per year by region");
    let by_region = mean_by_year(&dataset, Grouping::Region, indicator);
    plot::trend_lines(ui, "region_trends", &by_region, indicator);
    ui.add_space(8.0);

    ui.heading("Country history");
    let current = state.trend_country.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("trend_country")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for country in dataset.countries() {
                if ui.selectable_label(current == *country, country).clicked() {
                    state.trend_country = Some(country.clone());
                }
            }
        });
    if let Some(country) = &state.trend_country {
        let history = country_history(&dataset, country, indicator);
        plot::history_plot(ui, country, &history, indicator);
    }
    ui.add_space(8.0);

    ui.heading("Compare countries");
    egui::CollapsingHeader::new(format!("Countries ({})", state.trend_countries.len()))
        .id_salt("trend_countries")
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for country in dataset.countries() {
                    let mut on = state.trend_countries.contains(country);
                    if ui.checkbox(&mut on, country).changed() {
                        if on {
                            state.trend_countries.insert(country.clone());
                        } else {
                            state.trend_countries.remove(country);
                        }
                    }
                }
            });
        });
    let compared: Vec<_> = mean_by_year(&dataset, Grouping::Country, indicator)
        .into_iter()
        .filter(|s| state.trend_countries.contains(&s.group))
        .collect();
    plot::trend_lines(ui, "country_trends", &compared, indicator);
}

pub fn correlation(ui: &mut Ui, state: &mut AppState) {
    let available = state.dataset().indicators();

    ui.heading("Correlation matrix");
    indicator_checkboxes(ui, &available, &mut state.correlation_indicators);
    let matrix = correlation_matrix(&state.view(), &state.correlation_indicators);
    if matrix.indicators.len() < 2 {
        ui.label("Choose at least two indicators.");
    } else {
        table::correlation_grid(ui, &matrix);
        ui.label(format!("{} complete rows used.", matrix.rows_used));
    }
    ui.add_space(8.0);

    ui.heading("Scatter");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("x");
        indicator_combo(ui, "scatter_x", &available, &mut state.scatter_axes.0);
        ui.label("y");
        indicator_combo(ui, "scatter_y", &available, &mut state.scatter_axes.1);
    });
    let view = state.view();
    plot::region_scatter(ui, "free_scatter", &view, state.scatter_axes, &state.region_colors);
}

pub fn regression(ui: &mut Ui, state: &mut AppState) {
    let response = Indicator::Happiness;
    if !state.dataset().has_column(Column::Indicator(response)) {
        missing_column(ui, response);
        return;
    }
    let candidates: Vec<Indicator> = state
        .dataset()
        .indicators()
        .into_iter()
        .filter(|&i| i != response)
        .collect();

    ui.heading("Predict happiness");
    ui.label("Predictors:");
    if indicator_checkboxes(ui, &candidates, &mut state.regression_predictors) {
        state.simulation_value = None;
    }

    let fit = fit_ols(&state.view(), response, &state.regression_predictors);
    let fit = match fit {
        Ok(fit) => fit,
        Err(e) => {
            ui.label(RichText::new(format!("Cannot fit the model: {e}")).color(Color32::RED));
            return;
        }
    };
    table::coefficient_table(ui, &fit);
    ui.add_space(8.0);

    let simulated = match (fit.predictors.as_slice(), fit.predictor_ranges.first()) {
        ([predictor], Some(&(lo, hi))) => {
            let mut value = state
                .simulation_value
                .or(fit.predictor_means.first().copied())
                .unwrap_or(lo)
                .clamp(lo, hi);
            ui.add(egui::Slider::new(&mut value, lo..=hi).text(predictor.label()));
            state.simulation_value = Some(value);
            let predicted = fit.predict(&[value]);
            ui.label(RichText::new(format!("Predicted happiness: {predicted:.2}")).strong());
            Some([value, predicted])
        }
        _ => {
            ui.label("Select a single predictor to simulate a prediction.");
            None
        }
    };

    if fit.predictors.len() == 1 {
        let view = state.view();
        plot::regression_plot(ui, &view, &fit, simulated);
    }
}

pub fn about(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Documentation & data sources");
    ui.label(format!(
        "Data source: {} ({} records, {} countries, {} years).",
        state.config.data_source.display(),
        state.dataset().len(),
        state.dataset().countries().len(),
        state.dataset().years().len(),
    ));
    ui.add_space(6.0);

    ui.strong("Methodology");
    ui.label(
        "Each row is one country in one year. The sidebar filters combine with AND: \
         a row is shown when its year, country, region and subregion are selected and \
         every enabled range contains its value. Rows with a missing value fail any \
         range on that indicator. An unselected country, region or subregion list means \
         no constraint.",
    );
    ui.label(
        "Summary statistics ignore missing values. The standard deviation is the sample \
         deviation and quartiles are linearly interpolated. Statistics of an empty \
         selection are shown as undefined.",
    );
    ui.label(
        "Rankings average the chosen indicator per region or subregion over the \
         filtered rows. Trends use every year of the full dataset. Correlations are \
         Pearson coefficients over rows with all chosen indicators present. The \
         prediction model is an ordinary least squares fit of happiness on the chosen \
         predictors.",
    );
    ui.add_space(6.0);

    ui.strong("Sources");
    ui.label("World Happiness Report scores joined with country indicators by country name.");
    ui.label(format!(
        "Country outlines: {}.",
        state.config.world_boundaries.display()
    ));
    ui.label(format!(
        "File → Export CSV writes the visible rows and columns (default name {}).",
        state.config.export_file_name
    ));
}
