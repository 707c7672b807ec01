//! Ordinary least squares of one indicator on a set of predictors.

use thiserror::Error;

use crate::data::{FilteredView, Indicator};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("select at least one predictor")]
    NoPredictors,
    #[error("{rows} complete rows, need at least {required}")]
    InsufficientData { rows: usize, required: usize },
    #[error("predictors are collinear; the model cannot be identified")]
    Singular,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    /// Undefined with zero residual degrees of freedom.
    pub std_error: Option<f64>,
    /// Undefined when the standard error is zero or undefined.
    pub t_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub response: Indicator,
    pub predictors: Vec<Indicator>,
    pub intercept: Coefficient,
    pub coefficients: Vec<Coefficient>,
    /// Undefined when the response is constant.
    pub r_squared: Option<f64>,
    pub observations: usize,
    /// Range of each predictor over the fitted rows.
    pub predictor_ranges: Vec<(f64, f64)>,
    /// Mean of each predictor over the fitted rows.
    pub predictor_means: Vec<f64>,
}

impl OlsFit {
    /// Predicted response for one value per predictor, in predictor order.
    pub fn predict(&self, xs: &[f64]) -> f64 {
        self.intercept.estimate
            + self
                .coefficients
                .iter()
                .zip(xs)
                .map(|(c, x)| c.estimate * x)
                .sum::<f64>()
    }
}

/// Fit `response ~ 1 + predictors` on the rows of `view` that have every
/// value present.
pub fn fit_ols(
    view: &FilteredView<'_>,
    response: Indicator,
    predictors: &[Indicator],
) -> Result<OlsFit, RegressionError> {
    if predictors.is_empty() {
        return Err(RegressionError::NoPredictors);
    }

    let mut x_rows: Vec<Vec<f64>> = Vec::new();
    let mut y: Vec<f64> = Vec::new();
    for record in view.records() {
        let Some(yv) = record.value(response) else {
            continue;
        };
        let row: Option<Vec<f64>> = predictors.iter().map(|&p| record.value(p)).collect();
        if let Some(row) = row {
            x_rows.push(row);
            y.push(yv);
        }
    }

    let n = y.len();
    let k = predictors.len() + 1;
    if n < k {
        return Err(RegressionError::InsufficientData { rows: n, required: k });
    }

    // Normal equations: (X'X) b = X'y, with a leading column of ones.
    let design = |row: &[f64], j: usize| if j == 0 { 1.0 } else { row[j - 1] };
    let mut xtx = vec![0.0; k * k];
    let mut xty = vec![0.0; k];
    for (row, &yv) in x_rows.iter().zip(&y) {
        for a in 0..k {
            let xa = design(row, a);
            xty[a] += xa * yv;
            for b in 0..k {
                xtx[a * k + b] += xa * design(row, b);
            }
        }
    }

    let lu = LuDecomposition::decompose(&xtx, k).ok_or(RegressionError::Singular)?;
    let beta = lu.solve(&xty);

    let mean_y = y.iter().sum::<f64>() / n as f64;
    let mut sse = 0.0;
    let mut sst = 0.0;
    for (row, &yv) in x_rows.iter().zip(&y) {
        let fitted: f64 = (0..k).map(|j| beta[j] * design(row, j)).sum();
        sse += (yv - fitted).powi(2);
        sst += (yv - mean_y).powi(2);
    }

    let dof = n - k;
    let sigma2 = (dof > 0).then(|| sse / dof as f64);
    let coefficient = |j: usize, name: String| {
        let std_error = sigma2.map(|s2| {
            let mut unit = vec![0.0; k];
            unit[j] = 1.0;
            (s2 * lu.solve(&unit)[j]).max(0.0).sqrt()
        });
        let t_value = std_error.filter(|se| *se > 0.0).map(|se| beta[j] / se);
        Coefficient {
            name,
            estimate: beta[j],
            std_error,
            t_value,
        }
    };

    let predictor_ranges = (0..predictors.len())
        .map(|j| {
            x_rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
                (lo.min(row[j]), hi.max(row[j]))
            })
        })
        .collect();
    let predictor_means = (0..predictors.len())
        .map(|j| x_rows.iter().map(|row| row[j]).sum::<f64>() / n as f64)
        .collect();

    Ok(OlsFit {
        response,
        predictors: predictors.to_vec(),
        intercept: coefficient(0, "const".to_string()),
        coefficients: predictors
            .iter()
            .enumerate()
            .map(|(j, p)| coefficient(j + 1, p.label().to_string()))
            .collect(),
        r_squared: (sst > 0.0).then(|| 1.0 - sse / sst),
        observations: n,
        predictor_ranges,
        predictor_means,
    })
}

// ---------------------------------------------------------------------------
// LU decomposition with partial pivoting (PA = LU), row-major n x n.
// ---------------------------------------------------------------------------

struct LuDecomposition {
    /// Packed factors: strict lower triangle holds L, the rest holds U.
    lu: Vec<f64>,
    pivots: Vec<usize>,
    n: usize,
}

impl LuDecomposition {
    /// `None` when the matrix is numerically singular.
    fn decompose(a: &[f64], n: usize) -> Option<Self> {
        let mut lu = a.to_vec();
        let mut pivots: Vec<usize> = (0..n).collect();
        let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if scale == 0.0 {
            return None;
        }

        for k in 0..n {
            let mut max_row = k;
            let mut max_val = lu[k * n + k].abs();
            for i in (k + 1)..n {
                let val = lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_row != k {
                for j in 0..n {
                    lu.swap(k * n + j, max_row * n + j);
                }
                pivots.swap(k, max_row);
            }

            let pivot = lu[k * n + k];
            if pivot.abs() <= scale * 1e-12 {
                return None;
            }

            for i in (k + 1)..n {
                let factor = lu[i * n + k] / pivot;
                lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    let ukj = lu[k * n + j];
                    lu[i * n + j] -= factor * ukj;
                }
            }
        }

        Some(Self { lu, pivots, n })
    }

    fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.n;
        let mut x: Vec<f64> = self.pivots.iter().map(|&p| b[p]).collect();

        // Forward substitution: Ly = Pb
        for i in 1..n {
            for j in 0..i {
                let lij_xj = self.lu[i * n + j] * x[j];
                x[i] -= lij_xj;
            }
        }
        // Back substitution: Ux = y
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let uij_xj = self.lu[i * n + j] * x[j];
                x[i] -= uij_xj;
            }
            x[i] /= self.lu[i * n + i];
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{apply, Dataset, FilterCriteria, Record};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn recovers_exact_line() {
        let ds = Dataset::from_records(
            (1..=4)
                .map(|i| {
                    let x = i as f64;
                    Record::new(format!("C{i}"), 2024)
                        .with(Indicator::GdpPerCapita, x)
                        .with(Indicator::Happiness, 1.0 + 2.0 * x)
                })
                .collect(),
        )
        .unwrap();
        let view = apply(&ds, &FilterCriteria::default());

        let fit = fit_ols(&view, Indicator::Happiness, &[Indicator::GdpPerCapita]).unwrap();
        assert_eq!(fit.observations, 4);
        assert!(approx(fit.intercept.estimate, 1.0));
        assert!(approx(fit.coefficients[0].estimate, 2.0));
        assert!(approx(fit.r_squared.unwrap(), 1.0));
        assert!(approx(fit.predict(&[10.0]), 21.0));
        assert_eq!(fit.predictor_ranges, vec![(1.0, 4.0)]);
        assert_eq!(fit.predictor_means, vec![2.5]);
    }

    #[test]
    fn noisy_fit_reports_standard_errors() {
        let points = [(1.0, 2.1), (2.0, 3.9), (3.0, 6.2), (4.0, 7.8), (5.0, 10.1)];
        let ds = Dataset::from_records(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    Record::new(format!("C{i}"), 2024)
                        .with(Indicator::Climate, x)
                        .with(Indicator::Happiness, y)
                })
                .collect(),
        )
        .unwrap();
        let view = apply(&ds, &FilterCriteria::default());

        let fit = fit_ols(&view, Indicator::Happiness, &[Indicator::Climate]).unwrap();
        // Closed form for a single predictor: slope = Sxy / Sxx = 19.9 / 10.
        assert!(approx(fit.coefficients[0].estimate, 1.99));
        assert!(approx(fit.intercept.estimate, 0.05));
        let se = fit.coefficients[0].std_error.unwrap();
        assert!(se > 0.0 && se < 0.2);
        assert!(fit.coefficients[0].t_value.unwrap() > 10.0);
    }

    #[test]
    fn collinear_predictors_are_singular() {
        let ds = Dataset::from_records(
            (1..=5)
                .map(|i| {
                    let x = i as f64;
                    Record::new(format!("C{i}"), 2024)
                        .with(Indicator::Climate, x)
                        .with(Indicator::Pollution, 2.0 * x)
                        .with(Indicator::Happiness, x)
                })
                .collect(),
        )
        .unwrap();
        let view = apply(&ds, &FilterCriteria::default());
        let err = fit_ols(&view, Indicator::Happiness, &[Indicator::Climate, Indicator::Pollution])
            .unwrap_err();
        assert_eq!(err, RegressionError::Singular);
    }

    #[test]
    fn too_few_rows_or_no_predictors() {
        let ds = Dataset::from_records(vec![Record::new("A", 2024)
            .with(Indicator::Climate, 1.0)
            .with(Indicator::Happiness, 5.0)])
        .unwrap();
        let view = apply(&ds, &FilterCriteria::default());
        assert_eq!(
            fit_ols(&view, Indicator::Happiness, &[Indicator::Climate]),
            Err(RegressionError::InsufficientData { rows: 1, required: 2 })
        );
        assert_eq!(
            fit_ols(&view, Indicator::Happiness, &[]),
            Err(RegressionError::NoPredictors)
        );
    }
}
