use std::cmp::Ordering;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::analysis::{CorrelationMatrix, OlsFit};
use crate::color::diverging;
use crate::data::{Column, Descriptive, FilteredView, Record, SummaryStatistics};
use crate::state::AppState;

/// Rows of the statistics grid after `count`.
const STAT_ROWS: [&str; 8] = ["mean", "std", "min", "25%", "50%", "75%", "max", "range"];

/// Records of the view ordered for display: highest happiness first, rows
/// without a score last. The view itself keeps dataset order.
pub fn display_order<'a>(view: &FilteredView<'a>) -> Vec<&'a Record> {
    let mut rows: Vec<&Record> = view.records().collect();
    rows.sort_by(|a, b| match (a.happiness, b.happiness) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows
}

/// Menu of checkboxes choosing the table / export columns.
pub fn column_chooser(ui: &mut Ui, state: &mut AppState) {
    let columns = state.dataset().columns().to_vec();
    ui.menu_button("Columns", |ui: &mut Ui| {
        for column in columns {
            let mut shown = state.visible_columns.contains(&column);
            if ui.checkbox(&mut shown, column.header()).changed() {
                state.toggle_column(column);
            }
        }
    });
}

/// Scrollable table of the visible rows and columns.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let columns: Vec<Column> = state.export_columns();
    let view = state.view();
    let rows = display_order(&view);

    if rows.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }
    if columns.is_empty() {
        ui.label("No columns selected.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(360.0)
        .columns(TableColumn::auto().at_least(70.0), columns.len())
        .header(20.0, |mut header| {
            for column in &columns {
                header.col(|ui| {
                    ui.strong(column.header());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let record = rows[row.index()];
                for &column in &columns {
                    row.col(|ui| {
                        ui.label(record.cell_text(column));
                    });
                }
            });
        });
}

/// Descriptive statistics of the view, one column per indicator.
pub fn stats_panel(ui: &mut Ui, summary: &SummaryStatistics) {
    if summary.is_empty() {
        ui.label("No numeric indicators to summarise.");
        return;
    }

    egui::Grid::new("summary_stats")
        .striped(true)
        .spacing([16.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for column in summary.iter() {
                ui.strong(column.indicator.header());
            }
            ui.end_row();

            ui.label("count");
            for column in summary.iter() {
                ui.label(column.count.to_string());
            }
            ui.end_row();

            for row in STAT_ROWS {
                ui.label(row);
                for column in summary.iter() {
                    let text = column
                        .stats
                        .defined()
                        .and_then(|d| stat_value(d, row))
                        .map_or_else(|| "undefined".to_string(), format_value);
                    ui.label(text);
                }
                ui.end_row();
            }
        });
}

fn stat_value(d: &Descriptive, row: &str) -> Option<f64> {
    match row {
        "mean" => Some(d.mean),
        "std" => d.std_dev,
        "min" => Some(d.min),
        "25%" => Some(d.q1),
        "50%" => Some(d.median),
        "75%" => Some(d.q3),
        "max" => Some(d.max),
        "range" => Some(d.range()),
        _ => None,
    }
}

pub fn format_value(value: f64) -> String {
    if value.abs() >= 1.0e5 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Correlation matrix as a coloured grid.
pub fn correlation_grid(ui: &mut Ui, matrix: &CorrelationMatrix) {
    egui::Grid::new("correlation_grid")
        .spacing([6.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for indicator in &matrix.indicators {
                ui.strong(indicator.header());
            }
            ui.end_row();

            for (row, indicator) in matrix.indicators.iter().enumerate() {
                ui.strong(indicator.header());
                for col in 0..matrix.indicators.len() {
                    match matrix.get(row, col) {
                        Some(r) => ui.label(
                            RichText::new(format!(" {r:+.2} "))
                                .monospace()
                                .color(Color32::BLACK)
                                .background_color(diverging(r)),
                        ),
                        None => ui.label(RichText::new(" n/a ").monospace().weak()),
                    };
                }
                ui.end_row();
            }
        });
}

/// Coefficient table of a regression fit.
pub fn coefficient_table(ui: &mut Ui, fit: &OlsFit) {
    egui::Grid::new("coefficients")
        .striped(true)
        .spacing([16.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for title in ["Term", "Estimate", "Std. error", "t"] {
                ui.strong(title);
            }
            ui.end_row();

            for coefficient in std::iter::once(&fit.intercept).chain(&fit.coefficients) {
                ui.label(&coefficient.name);
                ui.label(format!("{:.4}", coefficient.estimate));
                ui.label(coefficient.std_error.map_or("–".into(), |v| format!("{v:.4}")));
                ui.label(coefficient.t_value.map_or("–".into(), |v| format!("{v:.2}")));
                ui.end_row();
            }
        });

    let r_squared = fit.r_squared.map_or("undefined".into(), |r| format!("{r:.3}"));
    ui.label(format!("R² = {r_squared}    n = {}", fit.observations));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, Indicator};

    #[test]
    fn display_order_puts_missing_scores_last() {
        let ds = Dataset::from_records(vec![
            Record::new("A", 2024).with(Indicator::Happiness, 5.0),
            Record::new("B", 2024),
            Record::new("C", 2024).with(Indicator::Happiness, 7.5),
        ])
        .unwrap();
        let view = FilteredView::full(&ds);
        let order: Vec<&str> = display_order(&view)
            .iter()
            .map(|r| r.country.as_str())
            .collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        // The view is untouched.
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn large_values_drop_decimals() {
        assert_eq!(format_value(7.2), "7.20");
        assert_eq!(format_value(1_234_567.8), "1234568");
    }
}
