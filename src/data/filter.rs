use std::collections::BTreeSet;

use super::error::FilterError;
use super::model::{Dataset, Indicator, Record};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// Inclusive numeric range. A null value never passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub min: f64,
    pub max: f64,
}

impl RangeFilter {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Option<f64>) -> bool {
        matches!(value, Some(v) if v >= self.min && v <= self.max)
    }

    /// An inverted range matches nothing.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearSelection {
    #[default]
    All,
    Exact(i32),
}

impl YearSelection {
    pub fn matches(&self, year: i32) -> bool {
        match self {
            YearSelection::All => true,
            YearSelection::Exact(y) => *y == year,
        }
    }
}

/// User-selected constraints. Every field is optional; `None` means
/// "no constraint", so `FilterCriteria::default()` matches everything.
///
/// Set constraints: a value passes when it is in the set; a null value and
/// an empty set pass nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub year: YearSelection,
    pub countries: Option<BTreeSet<String>>,
    pub regions: Option<BTreeSet<String>>,
    pub subregions: Option<BTreeSet<String>>,
    pub happiness_range: Option<RangeFilter>,
    pub gdp_range: Option<RangeFilter>,
    pub population_range: Option<RangeFilter>,
    pub median_age_range: Option<RangeFilter>,
    pub cost_of_living_range: Option<RangeFilter>,
    pub pollution_range: Option<RangeFilter>,
    pub climate_range: Option<RangeFilter>,
    pub prosperity_range: Option<RangeFilter>,
    pub fertility_range: Option<RangeFilter>,
    pub density_range: Option<RangeFilter>,
    pub purchasing_power_range: Option<RangeFilter>,
    pub land_area_range: Option<RangeFilter>,
}

impl FilterCriteria {
    pub fn range(&self, indicator: Indicator) -> Option<&RangeFilter> {
        self.range_slot(indicator).as_ref()
    }

    pub fn range_mut(&mut self, indicator: Indicator) -> &mut Option<RangeFilter> {
        match indicator {
            Indicator::Happiness => &mut self.happiness_range,
            Indicator::GdpPerCapita => &mut self.gdp_range,
            Indicator::Population => &mut self.population_range,
            Indicator::MedianAge => &mut self.median_age_range,
            Indicator::CostOfLiving => &mut self.cost_of_living_range,
            Indicator::Pollution => &mut self.pollution_range,
            Indicator::Climate => &mut self.climate_range,
            Indicator::ProsperityScore => &mut self.prosperity_range,
            Indicator::FertilityRate => &mut self.fertility_range,
            Indicator::Density => &mut self.density_range,
            Indicator::PurchasingPower => &mut self.purchasing_power_range,
            Indicator::LandArea => &mut self.land_area_range,
        }
    }

    fn range_slot(&self, indicator: Indicator) -> &Option<RangeFilter> {
        match indicator {
            Indicator::Happiness => &self.happiness_range,
            Indicator::GdpPerCapita => &self.gdp_range,
            Indicator::Population => &self.population_range,
            Indicator::MedianAge => &self.median_age_range,
            Indicator::CostOfLiving => &self.cost_of_living_range,
            Indicator::Pollution => &self.pollution_range,
            Indicator::Climate => &self.climate_range,
            Indicator::ProsperityScore => &self.prosperity_range,
            Indicator::FertilityRate => &self.fertility_range,
            Indicator::Density => &self.density_range,
            Indicator::PurchasingPower => &self.purchasing_power_range,
            Indicator::LandArea => &self.land_area_range,
        }
    }

    /// Whether a record satisfies every active constraint.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.year.matches(record.year) {
            return false;
        }
        if !in_set(&self.countries, Some(&record.country)) {
            return false;
        }
        if !in_set(&self.regions, record.region.as_ref()) {
            return false;
        }
        if !in_set(&self.subregions, record.subregion.as_ref()) {
            return false;
        }
        Indicator::ALL.iter().all(|&ind| match self.range(ind) {
            Some(range) => range.contains(record.value(ind)),
            None => true,
        })
    }

    /// Report ranges that can never match. Such criteria are still valid
    /// input for [`apply`]; they just produce an empty view.
    pub fn validate(&self) -> Result<(), FilterError> {
        for &ind in &Indicator::ALL {
            if let Some(r) = self.range(ind) {
                if r.is_inverted() {
                    return Err(FilterError::InvertedRange {
                        indicator: ind,
                        min: r.min,
                        max: r.max,
                    });
                }
            }
        }
        Ok(())
    }

    /// True when no constraint is active.
    pub fn is_unconstrained(&self) -> bool {
        *self == FilterCriteria::default()
    }
}

fn in_set(selected: &Option<BTreeSet<String>>, value: Option<&String>) -> bool {
    match (selected, value) {
        (None, _) => true,
        (Some(set), Some(v)) => set.contains(v),
        (Some(_), None) => false,
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The records of a [`Dataset`] that satisfy some criteria, in dataset
/// order. Borrowed from the dataset and never stored beyond a frame.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record.
    pub fn full(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices cached by the caller.
    pub(crate) fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        debug_assert!(indices.iter().all(|&i| i < dataset.len()));
        Self { dataset, indices }
    }

    /// Narrow this view further.
    pub fn apply(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        let records = self.dataset.records();
        FilteredView {
            dataset: self.dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| criteria.matches(&records[i]))
                .collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Positions of the visible records within the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Non-null values of one indicator, in view order.
    pub fn values(&self, indicator: Indicator) -> Vec<f64> {
        self.records().filter_map(|r| r.value(indicator)).collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the records of `dataset` that pass all active constraints.
pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    FilteredView::full(dataset).apply(criteria)
}
