use std::collections::HashMap;

use eframe::egui::{self, Color32, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};

use crate::analysis::{rank_groups, Grouping};
use crate::color::{normalize, sequential, MISSING_COLOR};
use crate::data::{FilteredView, Indicator};
use crate::geo::WorldMap;

const LEGEND_STEPS: usize = 9;

/// Mean value per country in the view, with the observed bounds.
pub fn country_values(
    view: &FilteredView<'_>,
    indicator: Indicator,
) -> (HashMap<String, f64>, Option<(f64, f64)>) {
    let means: HashMap<String, f64> = rank_groups(view, Grouping::Country, indicator, usize::MAX)
        .into_iter()
        .map(|g| (g.group, g.mean))
        .collect();
    let bounds = means.values().fold(None, |acc: Option<(f64, f64)>, &v| {
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    });
    (means, bounds)
}

/// Choropleth of `indicator` over the country outlines.
pub fn choropleth(ui: &mut Ui, world: Option<&WorldMap>, view: &FilteredView<'_>, indicator: Indicator) {
    let Some(world) = world.filter(|w| !w.is_empty()) else {
        ui.label("Map data is not available.");
        return;
    };

    let (values, bounds) = country_values(view, indicator);
    let (lo, hi) = bounds.unwrap_or((0.0, 1.0));

    Plot::new("choropleth")
        .height(480.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .show(ui, |plot_ui| {
            for shape in world.shapes() {
                let fill = values
                    .get(&shape.name)
                    .map_or(MISSING_COLOR, |&v| sequential(normalize(v, lo, hi)));
                for ring in &shape.rings {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(ring.clone()))
                            .fill_color(fill)
                            .stroke(Stroke::new(0.5, Color32::DARK_GRAY))
                            .name(&shape.name),
                    );
                }
            }
        });

    if bounds.is_some() {
        scale_legend(ui, indicator, lo, hi);
    }
    let matched = world.shapes().iter().filter(|s| values.contains_key(&s.name)).count();
    ui.label(format!(
        "{matched} of {} countries in the map have a {} value.",
        world.shapes().len(),
        indicator.label()
    ));
}

fn scale_legend(ui: &mut Ui, indicator: Indicator, lo: f64, hi: f64) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{}: {lo:.2}", indicator.label()));
        for step in 0..LEGEND_STEPS {
            let t = step as f64 / (LEGEND_STEPS - 1) as f64;
            let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 12.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 0.0, sequential(t));
        }
        ui.label(format!("{hi:.2}"));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 12.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 0.0, MISSING_COLOR);
        ui.label("no data");
    });
}
