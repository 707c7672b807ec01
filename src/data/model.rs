use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// Indicator – a numeric column of the joined table
// ---------------------------------------------------------------------------

/// The numeric indicators carried by every [`Record`].
///
/// Declaration order is the canonical column order used when a source does
/// not impose one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Happiness,
    GdpPerCapita,
    Population,
    MedianAge,
    CostOfLiving,
    Pollution,
    Climate,
    ProsperityScore,
    FertilityRate,
    Density,
    PurchasingPower,
    LandArea,
}

impl Indicator {
    pub const ALL: [Indicator; 12] = [
        Indicator::Happiness,
        Indicator::GdpPerCapita,
        Indicator::Population,
        Indicator::MedianAge,
        Indicator::CostOfLiving,
        Indicator::Pollution,
        Indicator::Climate,
        Indicator::ProsperityScore,
        Indicator::FertilityRate,
        Indicator::Density,
        Indicator::PurchasingPower,
        Indicator::LandArea,
    ];

    /// Header written to exported CSV files.
    pub fn header(self) -> &'static str {
        match self {
            Indicator::Happiness => "Happiness",
            Indicator::GdpPerCapita => "GDP per capita",
            Indicator::Population => "Population",
            Indicator::MedianAge => "MedAge",
            Indicator::CostOfLiving => "CostofLiving",
            Indicator::Pollution => "Pollution",
            Indicator::Climate => "Climate",
            Indicator::ProsperityScore => "Average Prosperity Score",
            Indicator::FertilityRate => "FertRate",
            Indicator::Density => "DensityKm2",
            Indicator::PurchasingPower => "PurchasingPower",
            Indicator::LandArea => "LandAreaKm2",
        }
    }

    /// Human readable label for widgets and chart axes.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Happiness => "Happiness Index",
            Indicator::GdpPerCapita => "GDP per Capita",
            Indicator::Population => "Population",
            Indicator::MedianAge => "Median Age",
            Indicator::CostOfLiving => "Cost of Living",
            Indicator::Pollution => "Pollution",
            Indicator::Climate => "Climate",
            Indicator::ProsperityScore => "Average Prosperity Score",
            Indicator::FertilityRate => "Fertility Rate",
            Indicator::Density => "Population Density (per Km²)",
            Indicator::PurchasingPower => "Purchasing Power",
            Indicator::LandArea => "Land Area (Km²)",
        }
    }

    /// Normalised header spellings found in the source tables.
    pub(crate) fn aliases(self) -> &'static [&'static str] {
        match self {
            Indicator::Happiness => &["happiness", "happinessindex", "index", "ladderscore"],
            Indicator::GdpPerCapita => &["gdppercapita", "gdpcapita"],
            Indicator::Population => &["population", "population2024"],
            Indicator::MedianAge => &["medage", "medianage"],
            Indicator::CostOfLiving => &["costofliving", "costoflivingindex"],
            Indicator::Pollution => &["pollution", "pollutionindex"],
            Indicator::Climate => &["climate", "climateindex"],
            Indicator::ProsperityScore => {
                &["averageprosperityscore", "prosperityscore", "prosperity"]
            }
            Indicator::FertilityRate => &["fertrate", "fertilityrate"],
            Indicator::Density => &["densitykm2", "densitypkm2", "density"],
            Indicator::PurchasingPower => &["purchasingpower", "purchasingpowerindex"],
            Indicator::LandArea => &["landareakm2", "landarea", "landareakm²"],
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column – any column of the joined table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Country,
    Region,
    Subregion,
    Year,
    Indicator(Indicator),
}

impl Column {
    /// Every known column in canonical order.
    pub fn all() -> Vec<Column> {
        let mut columns = vec![Column::Country, Column::Region, Column::Subregion, Column::Year];
        columns.extend(Indicator::ALL.iter().map(|&i| Column::Indicator(i)));
        columns
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Country => "Country",
            Column::Region => "Region",
            Column::Subregion => "Subregion",
            Column::Year => "Year",
            Column::Indicator(i) => i.header(),
        }
    }

    /// Resolve a source header to a known column, ignoring case, spaces and
    /// punctuation.
    pub fn from_header(header: &str) -> Option<Column> {
        let key = normalize_header(header);
        match key.as_str() {
            "country" | "countryname" => return Some(Column::Country),
            "region" => return Some(Column::Region),
            "subregion" => return Some(Column::Subregion),
            "year" => return Some(Column::Year),
            _ => {}
        }
        Indicator::ALL
            .iter()
            .find(|i| i.aliases().contains(&key.as_str()))
            .map(|&i| Column::Indicator(i))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Record – one country-year row
// ---------------------------------------------------------------------------

/// A single country-year observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub country: String,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub year: i32,
    pub happiness: Option<f64>,
    pub gdp_per_capita: Option<f64>,
    pub population: Option<f64>,
    pub median_age: Option<f64>,
    pub cost_of_living: Option<f64>,
    pub pollution: Option<f64>,
    pub climate: Option<f64>,
    pub prosperity_score: Option<f64>,
    pub fertility_rate: Option<f64>,
    pub density: Option<f64>,
    pub purchasing_power: Option<f64>,
    pub land_area: Option<f64>,
}

impl Record {
    pub fn new(country: impl Into<String>, year: i32) -> Self {
        Self {
            country: country.into(),
            year,
            ..Default::default()
        }
    }

    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Happiness => self.happiness,
            Indicator::GdpPerCapita => self.gdp_per_capita,
            Indicator::Population => self.population,
            Indicator::MedianAge => self.median_age,
            Indicator::CostOfLiving => self.cost_of_living,
            Indicator::Pollution => self.pollution,
            Indicator::Climate => self.climate,
            Indicator::ProsperityScore => self.prosperity_score,
            Indicator::FertilityRate => self.fertility_rate,
            Indicator::Density => self.density,
            Indicator::PurchasingPower => self.purchasing_power,
            Indicator::LandArea => self.land_area,
        }
    }

    pub fn value_mut(&mut self, indicator: Indicator) -> &mut Option<f64> {
        match indicator {
            Indicator::Happiness => &mut self.happiness,
            Indicator::GdpPerCapita => &mut self.gdp_per_capita,
            Indicator::Population => &mut self.population,
            Indicator::MedianAge => &mut self.median_age,
            Indicator::CostOfLiving => &mut self.cost_of_living,
            Indicator::Pollution => &mut self.pollution,
            Indicator::Climate => &mut self.climate,
            Indicator::ProsperityScore => &mut self.prosperity_score,
            Indicator::FertilityRate => &mut self.fertility_rate,
            Indicator::Density => &mut self.density,
            Indicator::PurchasingPower => &mut self.purchasing_power,
            Indicator::LandArea => &mut self.land_area,
        }
    }

    /// Builder-style setter, mostly handy for constructing fixtures.
    pub fn with(mut self, indicator: Indicator, value: f64) -> Self {
        *self.value_mut(indicator) = Some(value);
        self
    }

    pub fn with_region(mut self, region: &str, subregion: &str) -> Self {
        self.region = Some(region.to_string());
        self.subregion = Some(subregion.to_string());
        self
    }

    /// Text rendering of one cell; nulls render as the empty string.
    pub fn cell_text(&self, column: Column) -> String {
        match column {
            Column::Country => self.country.clone(),
            Column::Region => self.region.clone().unwrap_or_default(),
            Column::Subregion => self.subregion.clone().unwrap_or_default(),
            Column::Year => self.year.to_string(),
            Column::Indicator(i) => self.value(i).map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full, immutable table plus pre-computed value indices for widgets.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    columns: Vec<Column>,
    countries: BTreeSet<String>,
    regions: BTreeSet<String>,
    subregions: BTreeSet<String>,
    years: BTreeSet<i32>,
}

impl Dataset {
    /// Build a dataset. `columns` is the column order of the source table.
    ///
    /// Fails when two records share the same `(country, year)` identity.
    pub fn new(records: Vec<Record>, columns: Vec<Column>) -> Result<Self, LoadError> {
        let mut seen: HashSet<(&str, i32)> = HashSet::with_capacity(records.len());
        for rec in &records {
            if !seen.insert((rec.country.as_str(), rec.year)) {
                return Err(LoadError::DuplicateRecord {
                    country: rec.country.clone(),
                    year: rec.year,
                });
            }
        }

        let mut countries = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut subregions = BTreeSet::new();
        let mut years = BTreeSet::new();
        for rec in &records {
            countries.insert(rec.country.clone());
            if let Some(r) = &rec.region {
                regions.insert(r.clone());
            }
            if let Some(s) = &rec.subregion {
                subregions.insert(s.clone());
            }
            years.insert(rec.year);
        }

        Ok(Dataset {
            records,
            columns,
            countries,
            regions,
            subregions,
            years,
        })
    }

    /// Dataset holding every known column in canonical order.
    pub fn from_records(records: Vec<Record>) -> Result<Self, LoadError> {
        Self::new(records, Column::all())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Columns present in the source, in source order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Indicators present in the source, in source order.
    pub fn indicators(&self) -> Vec<Indicator> {
        self.columns
            .iter()
            .filter_map(|c| match c {
                Column::Indicator(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    pub fn subregions(&self) -> &BTreeSet<String> {
        &self.subregions
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Smallest and largest non-null value of an indicator, if any.
    pub fn bounds(&self, indicator: Indicator) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.value(indicator))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
