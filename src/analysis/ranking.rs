use std::collections::BTreeMap;

use crate::data::{FilteredView, Indicator, Record};

/// Which categorical column to group records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Region,
    Subregion,
    Country,
}

impl Grouping {
    pub fn key(self, record: &Record) -> Option<&str> {
        match self {
            Grouping::Region => record.region.as_deref(),
            Grouping::Subregion => record.subregion.as_deref(),
            Grouping::Country => Some(record.country.as_str()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grouping::Region => "Region",
            Grouping::Subregion => "Subregion",
            Grouping::Country => "Country",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    /// Non-null values that went into the mean.
    pub count: usize,
}

/// Mean of `indicator` per group, highest first, truncated to `limit`.
///
/// Records without a group key and null values are skipped; a group with no
/// values at all does not appear. Ties keep alphabetical order.
pub fn rank_groups(
    view: &FilteredView<'_>,
    grouping: Grouping,
    indicator: Indicator,
    limit: usize,
) -> Vec<GroupMean> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in view.records() {
        let (Some(key), Some(value)) = (grouping.key(record), record.value(indicator)) else {
            continue;
        };
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let mut ranked: Vec<GroupMean> = sums
        .into_iter()
        .map(|(group, (sum, count))| GroupMean {
            group: group.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect();
    // Stable sort keeps the alphabetical BTreeMap order among equal means.
    ranked.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    ranked.truncate(limit);
    ranked
}
