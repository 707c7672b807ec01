//! Writes a synthetic data set for trying the dashboard without the real
//! sources: the two-file CSV folder, the same rows joined into Parquet, and
//! a toy GeoJSON with one rectangle per country.
//!
//! Usage: `generate_sample [OUTPUT_DIR]`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use parquet::arrow::ArrowWriter;

use happiness_dashboard::data::loader::{COUNTRIES_CSV, HAPPINESS_CSV};

const YEARS: std::ops::RangeInclusive<i64> = 2015..=2024;

/// (country, region, subregion, baseline happiness, GDP per capita)
const COUNTRIES: [(&str, &str, &str, f64, f64); 16] = [
    ("Finland", "Europe", "Northern Europe", 7.7, 53_000.0),
    ("Denmark", "Europe", "Northern Europe", 7.6, 67_000.0),
    ("Germany", "Europe", "Western Europe", 7.0, 51_000.0),
    ("Italy", "Europe", "Southern Europe", 6.3, 34_000.0),
    ("Canada", "Americas", "Northern America", 7.0, 52_000.0),
    ("Brazil", "Americas", "South America", 6.2, 9_000.0),
    ("Mexico", "Americas", "Central America", 6.6, 11_000.0),
    ("Japan", "Asia", "Eastern Asia", 6.1, 34_000.0),
    ("India", "Asia", "Southern Asia", 4.0, 2_400.0),
    ("Viet Nam", "Asia", "South-eastern Asia", 5.8, 4_100.0),
    ("Nigeria", "Africa", "Western Africa", 4.9, 2_200.0),
    ("Kenya", "Africa", "Eastern Africa", 4.5, 2_100.0),
    ("Egypt", "Africa", "Northern Africa", 4.2, 3_500.0),
    ("Australia", "Oceania", "Australia and New Zealand", 7.1, 64_000.0),
    ("New Zealand", "Oceania", "Australia and New Zealand", 7.1, 48_000.0),
    ("Fiji", "Oceania", "Melanesia", 5.9, 5_300.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Static per-country indicators.
struct CountryRow {
    name: &'static str,
    region: &'static str,
    subregion: &'static str,
    gdp: f64,
    population: f64,
    median_age: f64,
    cost_of_living: f64,
    pollution: f64,
    fertility: f64,
    land_area: f64,
}

/// One happiness observation; `None` leaves the cell empty.
struct HappinessRow {
    country: &'static str,
    year: i64,
    index: Option<f64>,
}

fn generate(rng: &mut SimpleRng) -> (Vec<CountryRow>, Vec<HappinessRow>) {
    let mut countries = Vec::with_capacity(COUNTRIES.len());
    let mut happiness = Vec::new();

    for &(name, region, subregion, baseline, gdp) in &COUNTRIES {
        let wealth = (gdp / 70_000.0).clamp(0.0, 1.0);
        countries.push(CountryRow {
            name,
            region,
            subregion,
            gdp,
            population: (rng.uniform(1.0, 200.0) * 1.0e6).round(),
            median_age: (20.0 + 25.0 * wealth + rng.gauss(0.0, 2.0)).round(),
            cost_of_living: (30.0 + 50.0 * wealth + rng.gauss(0.0, 5.0)).max(10.0),
            pollution: (80.0 - 60.0 * wealth + rng.gauss(0.0, 8.0)).clamp(5.0, 100.0),
            fertility: (4.5 - 3.0 * wealth + rng.gauss(0.0, 0.2)).max(1.0),
            land_area: (10.0f64.powf(rng.uniform(4.0, 7.0))).round(),
        });

        for year in YEARS {
            // About one observation in twenty is missing.
            let index = (rng.next_f64() > 0.05)
                .then(|| (baseline + rng.gauss(0.0, 0.15)).clamp(0.0, 10.0));
            happiness.push(HappinessRow {
                country: name,
                year,
                index,
            });
        }
    }
    (countries, happiness)
}

fn write_csv_folder(dir: &Path, countries: &[CountryRow], happiness: &[HappinessRow]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut writer = csv::Writer::from_path(dir.join(HAPPINESS_CSV))?;
    writer.write_record(["Country", "Year", "Index"])?;
    for row in happiness {
        let index = row.index.map(|v| format!("{v:.3}")).unwrap_or_default();
        writer.write_record([row.country.to_string(), row.year.to_string(), index])?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(dir.join(COUNTRIES_CSV))?;
    writer.write_record([
        "Country",
        "Region",
        "Subregion",
        "GDP per capita",
        "Population",
        "MedAge",
        "CostofLiving",
        "Pollution",
        "FertRate",
        "LandAreaKm2",
    ])?;
    for c in countries {
        writer.write_record([
            c.name.to_string(),
            c.region.to_string(),
            c.subregion.to_string(),
            format!("{:.0}", c.gdp),
            format!("{:.0}", c.population),
            format!("{:.0}", c.median_age),
            format!("{:.1}", c.cost_of_living),
            format!("{:.1}", c.pollution),
            format!("{:.2}", c.fertility),
            format!("{:.0}", c.land_area),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, countries: &[CountryRow], happiness: &[HappinessRow]) -> anyhow::Result<usize> {
    let lookup = |name: &str| countries.iter().find(|c| c.name == name);
    let rows: Vec<(&HappinessRow, &CountryRow)> = happiness
        .iter()
        .filter_map(|h| Some((h, lookup(h.country)?)))
        .collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, true),
        Field::new("Subregion", DataType::Utf8, true),
        Field::new("Year", DataType::Int64, false),
        Field::new("Happiness", DataType::Float64, true),
        Field::new("GDP per capita", DataType::Float64, true),
        Field::new("Population", DataType::Float64, true),
        Field::new("MedAge", DataType::Float64, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|(h, _)| h.country))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|(_, c)| c.region))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|(_, c)| c.subregion))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|(h, _)| h.year))),
        Arc::new(Float64Array::from_iter(rows.iter().map(|(h, _)| h.index))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|(_, c)| c.gdp))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|(_, c)| c.population))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|(_, c)| c.median_age))),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(rows.len())
}

/// Countries laid out as rectangles on a 4-wide grid.
fn write_geojson(path: &Path, countries: &[CountryRow]) -> anyhow::Result<()> {
    let features = countries
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let x = (i % 4) as f64 * 40.0 - 80.0;
            let y = (i / 4) as f64 * 30.0 - 60.0;
            let ring = vec![
                vec![x, y],
                vec![x + 36.0, y],
                vec![x + 36.0, y + 26.0],
                vec![x, y + 26.0],
                vec![x, y],
            ];
            let mut properties = JsonObject::new();
            properties.insert("ADMIN".to_string(), c.name.into());
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    std::fs::write(path, collection.to_string()).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    let mut rng = SimpleRng::new(42);
    let (countries, happiness) = generate(&mut rng);

    let csv_dir = out_dir.join("countries_csv");
    write_csv_folder(&csv_dir, &countries, &happiness)?;
    println!(
        "Wrote {} happiness rows and {} countries to {}",
        happiness.len(),
        countries.len(),
        csv_dir.display()
    );

    let parquet_path = out_dir.join("sample_happiness.parquet");
    let n = write_parquet(&parquet_path, &countries, &happiness)?;
    println!("Wrote {n} joined rows to {}", parquet_path.display());

    let geojson_path = out_dir.join("ne_110m_admin_0_countries.geojson");
    write_geojson(&geojson_path, &countries)?;
    println!("Wrote {} outlines to {}", countries.len(), geojson_path.display());
    Ok(())
}
