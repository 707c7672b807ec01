//! Year-over-year views. These read the whole dataset: the sidebar filters
//! do not apply to trend analysis.

use std::collections::BTreeMap;

use super::ranking::Grouping;
use crate::data::{Dataset, Indicator};

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub group: String,
    /// `(year, mean)` in ascending year order.
    pub points: Vec<(i32, f64)>,
}

/// Pivot: mean of `indicator` per year for every group, groups sorted by name.
pub fn mean_by_year(dataset: &Dataset, grouping: Grouping, indicator: Indicator) -> Vec<TrendSeries> {
    let mut pivot: BTreeMap<&str, BTreeMap<i32, (f64, usize)>> = BTreeMap::new();
    for record in dataset.records() {
        let (Some(group), Some(value)) = (grouping.key(record), record.value(indicator)) else {
            continue;
        };
        let cell = pivot
            .entry(group)
            .or_default()
            .entry(record.year)
            .or_insert((0.0, 0));
        cell.0 += value;
        cell.1 += 1;
    }

    pivot
        .into_iter()
        .map(|(group, years)| TrendSeries {
            group: group.to_string(),
            points: years
                .into_iter()
                .map(|(year, (sum, n))| (year, sum / n as f64))
                .collect(),
        })
        .collect()
}

/// Every observation of one country, oldest first. Null values are kept so
/// gaps remain visible.
pub fn country_history(dataset: &Dataset, country: &str, indicator: Indicator) -> Vec<(i32, Option<f64>)> {
    let mut history: Vec<(i32, Option<f64>)> = dataset
        .records()
        .iter()
        .filter(|r| r.country == country)
        .map(|r| (r.year, r.value(indicator)))
        .collect();
    history.sort_by_key(|(year, _)| *year);
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            Record::new("A", 2023).with_region("West", "W").with(Indicator::Happiness, 7.0),
            Record::new("B", 2023).with_region("West", "W").with(Indicator::Happiness, 5.0),
            Record::new("A", 2024).with_region("West", "W").with(Indicator::Happiness, 7.5),
            Record::new("C", 2024).with_region("East", "E").with(Indicator::Happiness, 4.0),
            Record::new("C", 2022).with_region("East", "E"),
        ])
        .unwrap()
    }

    #[test]
    fn pivots_mean_per_region_and_year() {
        let series = mean_by_year(&dataset(), Grouping::Region, Indicator::Happiness);
        assert_eq!(
            series,
            vec![
                TrendSeries { group: "East".into(), points: vec![(2024, 4.0)] },
                TrendSeries { group: "West".into(), points: vec![(2023, 6.0), (2024, 7.5)] },
            ]
        );
    }

    #[test]
    fn history_is_sorted_and_keeps_gaps() {
        let history = country_history(&dataset(), "C", Indicator::Happiness);
        assert_eq!(history, vec![(2022, None), (2024, Some(4.0))]);
        assert!(country_history(&dataset(), "Nowhere", Indicator::Happiness).is_empty());
    }
}
