//! Descriptive statistics over a [`FilteredView`].

use super::filter::FilteredView;
use super::model::Indicator;

/// Indicators shown in the statistics panel, when present in the source.
pub const KEY_INDICATORS: [Indicator; 7] = [
    Indicator::Happiness,
    Indicator::ProsperityScore,
    Indicator::GdpPerCapita,
    Indicator::Population,
    Indicator::FertilityRate,
    Indicator::MedianAge,
    Indicator::LandArea,
];

/// Aggregates over the non-null values of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptive {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; needs at least two values.
    pub std_dev: Option<f64>,
    pub q1: f64,
    pub q3: f64,
}

impl Descriptive {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Either the aggregates, or `Undefined` when the column has no values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnStats {
    Undefined,
    Defined(Descriptive),
}

impl ColumnStats {
    pub fn defined(&self) -> Option<&Descriptive> {
        match self {
            ColumnStats::Defined(d) => Some(d),
            ColumnStats::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub indicator: Indicator,
    /// Number of non-null values.
    pub count: usize,
    pub stats: ColumnStats,
}

/// Per-indicator summaries, in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStatistics {
    columns: Vec<ColumnSummary>,
}

impl SummaryStatistics {
    pub fn get(&self, indicator: Indicator) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.indicator == indicator)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSummary> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Summarise the requested columns of a view. Nulls and non-finite values
/// are excluded from every aggregate, including `count`.
pub fn summarize(view: &FilteredView<'_>, columns: &[Indicator]) -> SummaryStatistics {
    let columns = columns
        .iter()
        .map(|&indicator| {
            let mut values = view.values(indicator);
            values.retain(|v| v.is_finite());
            ColumnSummary {
                indicator,
                count: values.len(),
                stats: describe(&values),
            }
        })
        .collect();
    SummaryStatistics { columns }
}

/// Aggregate a slice of values; non-finite values are ignored.
pub fn describe(values: &[f64]) -> ColumnStats {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return ColumnStats::Undefined;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std_dev = (n > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    ColumnStats::Defined(Descriptive {
        mean,
        median: quantile(&sorted, 0.5),
        min: sorted[0],
        max: sorted[n - 1],
        std_dev,
        q1: quantile(&sorted, 0.25),
        q3: quantile(&sorted, 0.75),
    })
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{apply, FilterCriteria, RangeFilter};
    use crate::data::model::{Dataset, Record};

    fn scenario() -> Dataset {
        Dataset::from_records(vec![
            Record::new("A", 2024)
                .with_region("West", "Western Europe")
                .with(Indicator::Happiness, 7.2)
                .with(Indicator::GdpPerCapita, 40000.0),
            Record::new("B", 2024)
                .with_region("East", "Eastern Asia")
                .with(Indicator::Happiness, 4.1)
                .with(Indicator::GdpPerCapita, 5000.0),
        ])
        .unwrap()
    }

    #[test]
    fn single_match_summary() {
        let ds = scenario();
        let criteria = FilterCriteria {
            happiness_range: Some(RangeFilter::new(5.0, 10.0)),
            ..Default::default()
        };
        let view = apply(&ds, &criteria);
        let summary = summarize(&view, &[Indicator::Happiness]);

        let happiness = summary.get(Indicator::Happiness).unwrap();
        assert_eq!(happiness.count, 1);
        let d = happiness.stats.defined().unwrap();
        assert_eq!((d.mean, d.median, d.min, d.max), (7.2, 7.2, 7.2, 7.2));
        assert_eq!(d.std_dev, None);
    }

    #[test]
    fn count_skips_non_finite_values() {
        let ds = Dataset::from_records(vec![
            Record::new("A", 2024).with(Indicator::Pollution, f64::INFINITY),
            Record::new("B", 2024).with(Indicator::Pollution, 30.0),
        ])
        .unwrap();
        let view = FilteredView::full(&ds);

        let summary = summarize(&view, &[Indicator::Pollution]);
        let pollution = summary.get(Indicator::Pollution).unwrap();
        assert_eq!(pollution.count, 1);
        assert_eq!(pollution.stats.defined().unwrap().mean, 30.0);

        let only_inf = FilteredView::from_indices(&ds, vec![0]);
        let summary = summarize(&only_inf, &[Indicator::Pollution]);
        let pollution = summary.get(Indicator::Pollution).unwrap();
        assert_eq!(pollution.count, 0);
        assert_eq!(pollution.stats, ColumnStats::Undefined);
    }

    #[test]
    fn region_summary_of_gdp() {
        let ds = scenario();
        let regions: BTreeSet<String> = ["West", "East"].iter().map(|s| s.to_string()).collect();
        let criteria = FilterCriteria {
            regions: Some(regions),
            ..Default::default()
        };
        let view = apply(&ds, &criteria);
        assert_eq!(view.len(), 2);

        let summary = summarize(&view, &[Indicator::GdpPerCapita]);
        let gdp = summary.get(Indicator::GdpPerCapita).unwrap();
        assert_eq!(gdp.count, 2);
        let d = gdp.stats.defined().unwrap();
        assert_eq!(d.mean, 22500.0);
        assert_eq!(d.median, 22500.0);
        assert_eq!(d.min, 5000.0);
        assert_eq!(d.max, 40000.0);
        assert_eq!(d.range(), 35000.0);
    }

    #[test]
    fn empty_view_is_undefined_not_zero() {
        let ds = scenario();
        let criteria = FilterCriteria {
            happiness_range: Some(RangeFilter::new(9.0, 10.0)),
            ..Default::default()
        };
        let view = apply(&ds, &criteria);
        let summary = summarize(&view, &Indicator::ALL);
        assert_eq!(summary.len(), Indicator::ALL.len());
        for col in summary.iter() {
            assert_eq!(col.count, 0);
            assert_eq!(col.stats, ColumnStats::Undefined);
        }
    }

    #[test]
    fn nulls_are_excluded_from_the_denominator() {
        let ds = Dataset::from_records(vec![
            Record::new("A", 2024).with(Indicator::Climate, 10.0),
            Record::new("B", 2024),
            Record::new("C", 2024).with(Indicator::Climate, 20.0),
        ])
        .unwrap();
        let view = apply(&ds, &FilterCriteria::default());
        let summary = summarize(&view, &[Indicator::Climate]);
        let climate = summary.get(Indicator::Climate).unwrap();
        assert_eq!(climate.count, 2);
        assert_eq!(climate.stats.defined().unwrap().mean, 15.0);
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let ColumnStats::Defined(d) = describe(&[4.0, 1.0, 3.0, 2.0]) else {
            panic!("expected defined stats");
        };
        assert_eq!(d.median, 2.5);
        assert_eq!(d.q1, 1.75);
        assert_eq!(d.q3, 3.25);
        let sd = d.std_dev.unwrap();
        assert!((sd - 1.2909944487358056).abs() < 1e-12);
    }
}
