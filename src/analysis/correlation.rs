use crate::data::{FilteredView, Indicator};

/// Pairwise Pearson correlations computed over complete rows only.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub indicators: Vec<Indicator>,
    /// Rows with a value for every selected indicator.
    pub rows_used: usize,
    values: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    /// `None` when the correlation is undefined (constant column or fewer
    /// than two rows).
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        let n = self.indicators.len();
        if row >= n || col >= n {
            return None;
        }
        self.values[row * n + col]
    }
}

pub fn correlation_matrix(view: &FilteredView<'_>, indicators: &[Indicator]) -> CorrelationMatrix {
    // Column-major copy of the complete rows.
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); indicators.len()];
    for record in view.records() {
        let row: Option<Vec<f64>> = indicators.iter().map(|&i| record.value(i)).collect();
        if let Some(row) = row {
            for (col, v) in columns.iter_mut().zip(row) {
                col.push(v);
            }
        }
    }

    let n = indicators.len();
    let mut values = vec![None; n * n];
    for a in 0..n {
        for b in a..n {
            let r = pearson(&columns[a], &columns[b]);
            values[a * n + b] = r;
            values[b * n + a] = r;
        }
    }

    CorrelationMatrix {
        indicators: indicators.to_vec(),
        rows_used: columns.first().map_or(0, Vec::len),
        values,
    }
}

/// Pearson correlation coefficient of two equally long samples.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}
