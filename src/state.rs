use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::export::{export_to_path, visible_columns};
use crate::data::stats::KEY_INDICATORS;
use crate::data::{
    summarize, Column, Dataset, ExportError, FilterCriteria, FilteredView, Indicator,
    RangeFilter, SummaryStatistics, YearSelection,
};
use crate::geo::WorldMap;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Map,
    Trends,
    Correlation,
    Regression,
    About,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Map,
        Tab::Trends,
        Tab::Correlation,
        Tab::Regression,
        Tab::About,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Data Overview & Summary",
            Tab::Map => "Map",
            Tab::Trends => "Trend Analysis",
            Tab::Correlation => "Correlation",
            Tab::Regression => "Predictive Modeling",
            Tab::About => "Documentation & Data Sources",
        }
    }
}

/// The categorical filters driven by multi-select widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Country,
    Region,
    Subregion,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded once at startup, never mutated.
    dataset: Arc<Dataset>,

    /// Current sidebar selections.
    criteria: FilterCriteria,

    /// Indices of records passing the current criteria (cached).
    visible_indices: Vec<usize>,

    /// Statistics of the current view (cached with the indices).
    summary: SummaryStatistics,

    /// Columns shown in the table and written on export.
    pub visible_columns: BTreeSet<Column>,

    /// Region colours for scatter plots and legends.
    pub region_colors: ColorMap,

    /// Country outlines; `None` when the boundaries file could not be read.
    pub world_map: Option<WorldMap>,

    pub tab: Tab,

    /// Indicator ranked in the overview bar charts.
    pub ranking_indicator: Indicator,

    /// Country drilled into on the trends tab.
    pub trend_country: Option<String>,

    /// Countries compared on the trends tab.
    pub trend_countries: BTreeSet<String>,

    /// Axes of the free scatter plot on the correlation tab.
    pub scatter_axes: (Indicator, Indicator),

    /// Indicators in the correlation heatmap.
    pub correlation_indicators: Vec<Indicator>,

    /// Predictors of the happiness regression.
    pub regression_predictors: Vec<Indicator>,

    /// Predictor value fed to the single-predictor simulation.
    pub simulation_value: Option<f64>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Warning about criteria that cannot match anything.
    pub filter_warning: Option<String>,
}

impl AppState {
    /// Initialise filters the way the dashboard opens: latest year selected,
    /// everything else unconstrained.
    pub fn new(dataset: Arc<Dataset>, config: Config, world_map: Option<WorldMap>) -> Self {
        let criteria = opening_criteria(&dataset);
        let indicators = dataset.indicators();
        let region_colors = ColorMap::new(dataset.regions());
        let trend_countries = dataset.countries().iter().take(5).cloned().collect();
        let regression_predictors = indicators
            .iter()
            .copied()
            .filter(|&i| i != Indicator::Happiness)
            .take(1)
            .collect();

        let mut state = Self {
            config,
            visible_columns: dataset.columns().iter().copied().collect(),
            region_colors,
            world_map,
            tab: Tab::Overview,
            ranking_indicator: Indicator::Happiness,
            trend_country: dataset.countries().first().cloned(),
            trend_countries,
            scatter_axes: (Indicator::GdpPerCapita, Indicator::Happiness),
            correlation_indicators: indicators,
            regression_predictors,
            simulation_value: None,
            status_message: None,
            filter_warning: None,
            criteria,
            visible_indices: Vec::new(),
            summary: SummaryStatistics::default(),
            dataset,
        };
        state.refilter();
        state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Shared handle, for widgets that read the dataset while mutating state.
    pub fn dataset_handle(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The current filtered view.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::from_indices(&self.dataset, self.visible_indices.clone())
    }

    pub fn visible_count(&self) -> usize {
        self.visible_indices.len()
    }

    pub fn summary(&self) -> &SummaryStatistics {
        &self.summary
    }

    /// Indicators of the statistics panel that the source provides.
    pub fn summary_indicators(&self) -> Vec<Indicator> {
        KEY_INDICATORS
            .iter()
            .copied()
            .filter(|&i| self.dataset.has_column(Column::Indicator(i)))
            .collect()
    }

    /// Re-derive the view and its statistics from the full dataset.
    pub fn refilter(&mut self) {
        let view = crate::data::apply(&self.dataset, &self.criteria);
        self.summary = summarize(&view, &self.summary_indicators());
        self.visible_indices = view.indices().to_vec();
        self.filter_warning = self.criteria.validate().err().map(|e| e.to_string());
        // Regression inputs changed; the simulation restarts from the mean.
        self.simulation_value = None;
    }

    pub fn set_year(&mut self, year: YearSelection) {
        if self.criteria.year != year {
            self.criteria.year = year;
            self.refilter();
        }
    }

    pub fn set_range(&mut self, indicator: Indicator, range: Option<RangeFilter>) {
        let slot = self.criteria.range_mut(indicator);
        if *slot != range {
            *slot = range;
            self.refilter();
        }
    }

    /// Back to the opening criteria: latest year, nothing else constrained.
    pub fn reset_filters(&mut self) {
        self.criteria = opening_criteria(&self.dataset);
        self.refilter();
    }

    fn all_values(&self, field: SetField) -> &BTreeSet<String> {
        match field {
            SetField::Country => self.dataset.countries(),
            SetField::Region => self.dataset.regions(),
            SetField::Subregion => self.dataset.subregions(),
        }
    }

    fn set_slot(&mut self, field: SetField) -> &mut Option<BTreeSet<String>> {
        match field {
            SetField::Country => &mut self.criteria.countries,
            SetField::Region => &mut self.criteria.regions,
            SetField::Subregion => &mut self.criteria.subregions,
        }
    }

    pub fn selection(&self, field: SetField) -> Option<&BTreeSet<String>> {
        match field {
            SetField::Country => self.criteria.countries.as_ref(),
            SetField::Region => self.criteria.regions.as_ref(),
            SetField::Subregion => self.criteria.subregions.as_ref(),
        }
    }

    /// Whether a value is currently selected (unconstrained = all selected).
    pub fn is_selected(&self, field: SetField, value: &str) -> bool {
        self.selection(field).map_or(true, |set| set.contains(value))
    }

    /// Toggle a single value in a membership filter.
    pub fn toggle_member(&mut self, field: SetField, value: &str) {
        let all = self.all_values(field).clone();
        let slot = self.set_slot(field);
        let selected = slot.get_or_insert_with(|| all.clone());
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        if *selected == all {
            // Everything selected again: drop the constraint so null keys pass.
            *slot = None;
        }
        self.refilter();
    }

    /// Select all values (removes the constraint).
    pub fn select_all(&mut self, field: SetField) {
        *self.set_slot(field) = None;
        self.refilter();
    }

    /// Deselect all values; the view becomes empty.
    pub fn select_none(&mut self, field: SetField) {
        *self.set_slot(field) = Some(BTreeSet::new());
        self.refilter();
    }

    pub fn toggle_column(&mut self, column: Column) {
        if !self.visible_columns.remove(&column) {
            self.visible_columns.insert(column);
        }
    }

    /// Visible columns in dataset order.
    pub fn export_columns(&self) -> Vec<Column> {
        visible_columns(&self.view(), &self.visible_columns)
    }

    /// Write the current view to `path`, recording the outcome in the status
    /// line.
    pub fn export_to(&mut self, path: &Path) -> Result<usize, ExportError> {
        let result = export_to_path(&self.view(), &self.export_columns(), path);
        self.status_message = Some(match &result {
            Ok(n) => format!("Exported {n} rows to {}", path.display()),
            Err(e) => format!("Export failed: {e}"),
        });
        result
    }
}

fn opening_criteria(dataset: &Dataset) -> FilterCriteria {
    FilterCriteria {
        year: dataset
            .latest_year()
            .map_or(YearSelection::All, YearSelection::Exact),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn state() -> AppState {
        let ds = Dataset::from_records(vec![
            Record::new("A", 2023).with_region("West", "W").with(Indicator::Happiness, 7.0),
            Record::new("A", 2024).with_region("West", "W").with(Indicator::Happiness, 7.2),
            Record::new("B", 2024).with_region("East", "E").with(Indicator::Happiness, 4.1),
            Record::new("C", 2024).with(Indicator::Happiness, 5.5),
        ])
        .unwrap();
        AppState::new(Arc::new(ds), Config::default(), None)
    }

    #[test]
    fn opens_on_latest_year() {
        let s = state();
        assert_eq!(s.criteria().year, YearSelection::Exact(2024));
        assert_eq!(s.visible_count(), 3);
        assert_eq!(s.summary().get(Indicator::Happiness).unwrap().count, 3);
    }

    #[test]
    fn toggling_a_region_excludes_it() {
        let mut s = state();
        s.toggle_member(SetField::Region, "East");
        assert!(!s.is_selected(SetField::Region, "East"));
        let countries: Vec<String> = s.view().records().map(|r| r.country.clone()).collect();
        assert_eq!(countries, vec!["A"]);

        s.toggle_member(SetField::Region, "East");
        assert_eq!(s.selection(SetField::Region), None);
        assert_eq!(s.visible_count(), 3);
    }

    #[test]
    fn select_none_empties_the_view() {
        let mut s = state();
        s.select_none(SetField::Country);
        assert_eq!(s.visible_count(), 0);
        assert_eq!(
            s.summary().get(Indicator::Happiness).unwrap().stats,
            crate::data::ColumnStats::Undefined
        );
        s.select_all(SetField::Country);
        assert_eq!(s.visible_count(), 3);
    }

    #[test]
    fn inverted_range_warns() {
        let mut s = state();
        s.set_range(Indicator::Happiness, Some(RangeFilter::new(6.0, 5.0)));
        assert_eq!(s.visible_count(), 0);
        assert!(s.filter_warning.is_some());
        s.set_range(Indicator::Happiness, None);
        assert!(s.filter_warning.is_none());
    }

    #[test]
    fn reset_returns_to_latest_year() {
        let mut s = state();
        s.set_year(YearSelection::All);
        s.toggle_member(SetField::Region, "East");
        s.set_range(Indicator::Happiness, Some(RangeFilter::new(0.0, 6.0)));
        assert_eq!(s.visible_count(), 0);

        s.reset_filters();
        assert_eq!(s.criteria().year, YearSelection::Exact(2024));
        assert_eq!(s.selection(SetField::Region), None);
        assert_eq!(s.criteria().range(Indicator::Happiness), None);
        assert_eq!(s.visible_count(), 3);
    }

    #[test]
    fn exports_visible_columns_only() {
        let mut s = state();
        s.toggle_column(Column::Region);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(s.export_to(&path).unwrap(), 3);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Country,Subregion,Year,Happiness"));
        assert!(s.status_message.unwrap().starts_with("Exported 3 rows"));
    }
}
