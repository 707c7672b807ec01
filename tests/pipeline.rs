//! Load → filter → summarise → export, end to end on files in a temp dir.

use std::collections::BTreeSet;
use std::path::Path;

use happiness_dashboard::analysis::{rank_groups, Grouping};
use happiness_dashboard::data::export::export_to_path;
use happiness_dashboard::data::loader::{COUNTRIES_CSV, HAPPINESS_CSV};
use happiness_dashboard::data::{
    apply, load, summarize, Column, DataSource, FilterCriteria, FilteredView, Indicator,
    LoadError, RangeFilter,
};

fn write(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).unwrap();
}

/// Two countries with the happiness scores and GDP used throughout.
fn csv_folder(dir: &Path) {
    write(
        dir,
        HAPPINESS_CSV,
        "Country,Year,Index\nA,2024,7.2\nB,2024,4.1\nUnmatched,2024,5.0\n",
    );
    write(
        dir,
        COUNTRIES_CSV,
        "Country,Region,Subregion,GDP per capita\nA,West,Western,40000\nB,East,Eastern,5000\n",
    );
}

#[test]
fn happiness_range_keeps_only_the_happy_country() {
    let dir = tempfile::tempdir().unwrap();
    csv_folder(dir.path());
    let dataset = load(&DataSource::from_path(dir.path()).unwrap()).unwrap();
    assert_eq!(dataset.len(), 2);

    let criteria = FilterCriteria {
        happiness_range: Some(RangeFilter::new(5.0, 10.0)),
        ..Default::default()
    };
    let view = apply(&dataset, &criteria);
    let countries: Vec<&str> = view.records().map(|r| r.country.as_str()).collect();
    assert_eq!(countries, vec!["A"]);

    let summary = summarize(&view, &[Indicator::Happiness]);
    let happiness = summary.get(Indicator::Happiness).unwrap();
    assert_eq!(happiness.count, 1);
    let stats = happiness.stats.defined().unwrap();
    assert_eq!(stats.mean, 7.2);
    assert_eq!(stats.median, 7.2);
    assert_eq!(stats.min, 7.2);
    assert_eq!(stats.max, 7.2);
}

#[test]
fn region_membership_keeps_both_countries() {
    let dir = tempfile::tempdir().unwrap();
    csv_folder(dir.path());
    let dataset = load(&DataSource::from_path(dir.path()).unwrap()).unwrap();

    let criteria = FilterCriteria {
        regions: Some(BTreeSet::from(["West".to_string(), "East".to_string()])),
        ..Default::default()
    };
    let view = apply(&dataset, &criteria);
    assert_eq!(view.len(), 2);

    let summary = summarize(&view, &[Indicator::GdpPerCapita]);
    let gdp = summary.get(Indicator::GdpPerCapita).unwrap();
    assert_eq!(gdp.count, 2);
    let stats = gdp.stats.defined().unwrap();
    assert_eq!(stats.mean, 22500.0);
    assert_eq!(stats.min, 5000.0);
    assert_eq!(stats.max, 40000.0);

    let ranked = rank_groups(&view, Grouping::Region, Indicator::Happiness, 10);
    assert_eq!(ranked[0].group, "West");
    assert_eq!(ranked[1].group, "East");
}

#[test]
fn exported_csv_loads_back_to_the_same_rows() {
    let dir = tempfile::tempdir().unwrap();
    csv_folder(dir.path());
    let dataset = load(&DataSource::from_path(dir.path()).unwrap()).unwrap();

    let view = FilteredView::full(&dataset);
    let out = dir.path().join("global_happiness_data.csv");
    assert_eq!(export_to_path(&view, dataset.columns(), &out).unwrap(), 2);

    let reloaded = load(&DataSource::from_path(&out).unwrap()).unwrap();
    assert_eq!(reloaded.columns(), dataset.columns());
    assert_eq!(reloaded.records(), dataset.records());
}

#[test]
fn exporting_a_subset_of_columns_keeps_dataset_order() {
    let dir = tempfile::tempdir().unwrap();
    csv_folder(dir.path());
    let dataset = load(&DataSource::from_path(dir.path()).unwrap()).unwrap();

    let view = FilteredView::full(&dataset);
    let columns = [Column::Country, Column::Indicator(Indicator::Happiness)];
    let out = dir.path().join("subset.csv");
    export_to_path(&view, &columns, &out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text, "Country,Happiness\nA,7.2\nB,4.1\n");
}

#[test]
fn missing_folder_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), HAPPINESS_CSV, "Country,Year,Index\nA,2024,7.2\n");
    let err = load(&DataSource::from_path(dir.path()).unwrap()).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
}
