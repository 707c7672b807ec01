use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use super::error::ExportError;
use super::filter::FilteredView;
use super::model::Column;

pub const DEFAULT_EXPORT_FILE: &str = "global_happiness_data.csv";

/// The visible columns, re-ordered to follow the dataset's column order.
pub fn visible_columns(view: &FilteredView<'_>, visible: &BTreeSet<Column>) -> Vec<Column> {
    view.dataset()
        .columns()
        .iter()
        .copied()
        .filter(|c| visible.contains(c))
        .collect()
}

/// Write the view as UTF-8 CSV: one header row, then one line per record.
/// Returns the number of records written.
pub fn write_csv<W: io::Write>(
    view: &FilteredView<'_>,
    columns: &[Column],
    writer: W,
) -> Result<usize, ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.iter().map(|c| c.header()))?;

    let mut written = 0;
    for record in view.records() {
        wtr.write_record(columns.iter().map(|&c| record.cell_text(c)))?;
        written += 1;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(written)
}

/// In-memory export, as served by a download button.
pub fn to_csv_bytes(view: &FilteredView<'_>, columns: &[Column]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(view, columns, &mut buf)?;
    Ok(buf)
}

pub fn export_to_path(
    view: &FilteredView<'_>,
    columns: &[Column],
    path: &Path,
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let written = write_csv(view, columns, io::BufWriter::new(file))?;
    log::info!("Exported {written} records to {}", path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterCriteria, YearSelection};
    use crate::data::model::{Dataset, Indicator, Record};

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Record::new("Korea, Republic of", 2024)
                    .with_region("Asia", "Eastern Asia")
                    .with(Indicator::Happiness, 6.058),
                Record::new("Chile", 2023).with(Indicator::Happiness, 6.36),
            ],
            vec![
                Column::Country,
                Column::Year,
                Column::Indicator(Indicator::Happiness),
                Column::Region,
            ],
        )
        .unwrap()
    }

    #[test]
    fn writes_header_and_visible_rows() {
        let ds = dataset();
        let criteria = FilterCriteria {
            year: YearSelection::Exact(2024),
            ..Default::default()
        };
        let view = apply(&ds, &criteria);
        let bytes = to_csv_bytes(&view, ds.columns()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Country,Year,Happiness,Region\n\"Korea, Republic of\",2024,6.058,Asia\n"
        );
    }

    #[test]
    fn follows_dataset_column_order() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::default());
        let visible: BTreeSet<Column> = [Column::Region, Column::Country].into_iter().collect();
        assert_eq!(
            visible_columns(&view, &visible),
            vec![Column::Country, Column::Region]
        );
    }

    #[test]
    fn empty_view_still_has_header() {
        let ds = dataset();
        let criteria = FilterCriteria {
            year: YearSelection::Exact(1999),
            ..Default::default()
        };
        let view = apply(&ds, &criteria);
        let text = String::from_utf8(to_csv_bytes(&view, &[Column::Country]).unwrap()).unwrap();
        assert_eq!(text, "Country\n");
    }
}
