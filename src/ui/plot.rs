use std::collections::BTreeMap;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, Points, Text};

use crate::analysis::{GroupMean, OlsFit, TrendSeries};
use crate::color::{generate_palette, ColorMap};
use crate::data::{FilteredView, Indicator};

const PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Horizontal bars of group means, the highest on top, each labelled with its
/// group name.
pub fn ranking_chart(
    ui: &mut Ui,
    id: &str,
    ranked: &[GroupMean],
    indicator: Indicator,
    colors: Option<&ColorMap>,
) {
    if ranked.is_empty() {
        ui.label(format!("No {} values in the current selection.", indicator.label()));
        return;
    }

    let n = ranked.len();
    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let fill = colors.map_or(Color32::from_rgb(65, 182, 196), |cm| {
                cm.color_for(Some(g.group.as_str()))
            });
            Bar::new((n - i) as f64, g.mean)
                .name(format!("{} (n={})", g.group, g.count))
                .fill(fill)
        })
        .collect();
    let chart = BarChart::new(bars).horizontal().name(indicator.label());

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(indicator.label())
        .show_y(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            for (i, g) in ranked.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(0.0, (n - i) as f64), RichText::new(&g.group).strong())
                        .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter plots
// ---------------------------------------------------------------------------

/// Scatter of two indicators over the view, one series per region.
pub fn region_scatter(
    ui: &mut Ui,
    id: &str,
    view: &FilteredView<'_>,
    axes: (Indicator, Indicator),
    colors: &ColorMap,
) {
    let (x_ind, y_ind) = axes;
    let mut groups: BTreeMap<Option<&str>, Vec<[f64; 2]>> = BTreeMap::new();
    for record in view.records() {
        if let (Some(x), Some(y)) = (record.value(x_ind), record.value(y_ind)) {
            groups.entry(record.region.as_deref()).or_default().push([x, y]);
        }
    }

    if groups.is_empty() {
        ui.label("No rows with both values in the current selection.");
        return;
    }

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_ind.label())
        .y_axis_label(y_ind.label())
        .show(ui, |plot_ui| {
            for (region, points) in groups {
                plot_ui.points(
                    Points::new(points)
                        .name(region.unwrap_or("Unknown"))
                        .color(colors.color_for(region))
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Line charts
// ---------------------------------------------------------------------------

/// One line per series over the years.
pub fn trend_lines(ui: &mut Ui, id: &str, series: &[TrendSeries], indicator: Indicator) {
    if series.is_empty() {
        ui.label("Nothing to plot.");
        return;
    }
    let palette = generate_palette(series.len());

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(indicator.label())
        .show(ui, |plot_ui| {
            for (s, color) in series.iter().zip(palette) {
                let points: Vec<[f64; 2]> =
                    s.points.iter().map(|&(year, v)| [year as f64, v]).collect();
                plot_ui.line(Line::new(points.clone()).name(&s.group).color(color).width(1.5));
                plot_ui.points(Points::new(points).color(color).radius(2.5));
            }
        });
}

/// Yearly values of one country; missing years leave a gap.
pub fn history_plot(
    ui: &mut Ui,
    country: &str,
    history: &[(i32, Option<f64>)],
    indicator: Indicator,
) {
    // Split into runs of consecutive present values.
    let mut segments: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for &(year, value) in history {
        match value {
            Some(v) => current.push([year as f64, v]),
            None => segments.push(std::mem::take(&mut current)),
        }
    }
    segments.push(current);
    segments.retain(|s| !s.is_empty());
    if segments.is_empty() {
        ui.label(format!("No {} values for {country}.", indicator.label()));
        return;
    }

    let color = Color32::from_rgb(34, 94, 168);
    Plot::new("country_history")
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(indicator.label())
        .show(ui, |plot_ui| {
            for segment in segments {
                plot_ui.line(Line::new(segment.clone()).name(country).color(color).width(2.0));
                plot_ui.points(Points::new(segment).color(color).radius(3.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Regression
// ---------------------------------------------------------------------------

/// Observations, fitted line and the simulated prediction of a
/// single-predictor fit.
pub fn regression_plot(ui: &mut Ui, view: &FilteredView<'_>, fit: &OlsFit, simulated: Option<[f64; 2]>) {
    let (Some(&predictor), Some(&(lo, hi))) = (fit.predictors.first(), fit.predictor_ranges.first())
    else {
        return;
    };

    let observed: Vec<[f64; 2]> = view
        .records()
        .filter_map(|r| Some([r.value(predictor)?, r.value(fit.response)?]))
        .collect();
    let fitted = vec![[lo, fit.predict(&[lo])], [hi, fit.predict(&[hi])]];

    Plot::new("regression_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(predictor.label())
        .y_axis_label(fit.response.label())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(observed)
                    .name("Observed")
                    .color(Color32::from_rgb(65, 182, 196))
                    .radius(3.0),
            );
            plot_ui.line(
                Line::new(fitted)
                    .name("Fitted")
                    .color(Color32::from_rgb(8, 29, 88))
                    .width(2.0),
            );
            if let Some(point) = simulated {
                plot_ui.points(
                    Points::new(vec![point])
                        .name("Prediction")
                        .color(Color32::RED)
                        .radius(6.0),
                );
            }
        });
}
