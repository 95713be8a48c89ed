//! Error function, its inverse and the Laplace function table.
//!
//! The Laplace function here is `Φ₀(x) = erf(x / √2) / 2`, the probability
//! mass of the standard normal distribution between `0` and `x`.

use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};

use crate::numeric::{meaning_decimals, round_decimals};

/// Standard error function.
pub fn erf(x: f64) -> f64 {
    libm::erf(x)
}

/// Inverse of [`erf`] on `[-1, 1]`.
///
/// Returns `±∞` at `±1` and NaN outside the domain.
pub fn erf_inv(y: f64) -> f64 {
    if y.is_nan() || !(-1.0..=1.0).contains(&y) {
        return f64::NAN;
    }
    if y == 1.0 {
        return f64::INFINITY;
    }
    if y == -1.0 {
        return f64::NEG_INFINITY;
    }
    if y == 0.0 {
        return y;
    }
    let sign = y.signum();
    let a = y.abs();
    let mut x = initial_guess(a);
    // Halley refinement; the residual is taken through erfc in the tail so it
    // does not cancel against 1.
    let tail = 1.0 - a;
    for _ in 0..3 {
        let residual = if a > 0.5 {
            tail - libm::erfc(x)
        } else {
            libm::erf(x) - a
        };
        let slope = 2.0 / PI.sqrt() * (-x * x).exp();
        if slope == 0.0 || !residual.is_finite() {
            break;
        }
        let step = residual / (slope + x * residual);
        x -= step;
        if step.abs() <= f64::EPSILON * x.abs() {
            break;
        }
    }
    sign * x
}

fn initial_guess(a: f64) -> f64 {
    let mut w = -((1.0 - a) * (1.0 + a)).ln();
    let p = if w < 5.0 {
        w -= 2.5;
        [
            3.432_739_39e-7,
            -3.523_387_7e-6,
            -4.391_506_54e-6,
            2.185_808_7e-4,
            -1.253_725_03e-3,
            -4.177_681_64e-3,
            2.466_407_27e-1,
            1.501_409_41,
        ]
        .iter()
        .fold(2.810_226_36e-8, |p, c| c + p * w)
    } else {
        w = w.sqrt() - 3.0;
        [
            1.009_505_58e-4,
            1.349_343_22e-3,
            -3.673_428_44e-3,
            5.739_507_73e-3,
            -7.622_461_3e-3,
            9.438_870_47e-3,
            1.001_674_06,
            2.832_976_82,
        ]
        .iter()
        .fold(-2.002_142_57e-4, |p, c| c + p * w)
    };
    p * a
}

/// Laplace function `erf(x / √2) / 2`.
pub fn laplace(x: f64) -> f64 {
    erf(x / SQRT_2) / 2.0
}

/// Argument at which [`laplace`] reaches `p`, for `p ∈ [-0.5, 0.5]`.
pub fn laplace_inverse(p: f64) -> f64 {
    SQRT_2 * erf_inv(2.0 * p)
}

/// Two-sided standard normal quantile of a confidence level.
///
/// `z_score(0.95) ≈ 1.96`.
pub fn z_score(confidence: f64) -> f64 {
    laplace_inverse(confidence / 2.0)
}

/// Half-width of the confidence interval of a hit-or-miss estimate.
///
/// The estimate is `area × p` with `p` the hit ratio over `points` samples.
pub fn statistical_error(confidence: f64, area: f64, hit_ratio: f64, points: usize) -> f64 {
    if points == 0 {
        return f64::INFINITY;
    }
    let variance = hit_ratio * (1.0 - hit_ratio) / points as f64;
    z_score(confidence) * area.abs() * variance.max(0.0).sqrt()
}

/// Samples needed so the estimate's [`statistical_error`] stays below `target_error`.
///
/// `None` when the inputs cannot produce a finite count.
pub fn required_points(
    confidence: f64,
    target_error: f64,
    area: f64,
    hit_ratio: f64,
) -> Option<usize> {
    if !(confidence > 0.0 && confidence < 1.0) || !(target_error > 0.0) {
        return None;
    }
    if !(0.0..=1.0).contains(&hit_ratio) || !area.is_finite() {
        return None;
    }
    let spread = z_score(confidence) * area.abs() / target_error;
    let count = (spread * spread * hit_ratio * (1.0 - hit_ratio)).ceil();
    if count.is_finite() && count < usize::MAX as f64 {
        Some(count as usize)
    } else {
        None
    }
}

/// Grid of Laplace function values, laid out like a printed statistics table.
///
/// Cell `(r, c)` holds `laplace(r × step_y + c × step_x)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaplaceTable {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Argument increment between rows.
    pub step_y: f64,
    /// Argument increment between columns.
    pub step_x: f64,
}

impl Default for LaplaceTable {
    fn default() -> Self {
        Self {
            rows: 40,
            cols: 10,
            step_y: 0.1,
            step_x: 0.01,
        }
    }
}

/// One printed line of a [`LaplaceTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaplaceRow {
    /// Argument of the first column.
    pub argument: f64,
    /// Function values, one per column.
    pub values: Vec<f64>,
}

impl LaplaceTable {
    /// Row arguments, rounded to the precision of the row step.
    pub fn row_arguments(&self) -> Vec<f64> {
        axis(self.rows, self.step_y)
    }

    /// Column offsets, rounded to the precision of the column step.
    pub fn col_arguments(&self) -> Vec<f64> {
        axis(self.cols, self.step_x)
    }

    /// Argument of cell `(row, col)`.
    pub fn argument(&self, row: usize, col: usize) -> f64 {
        let decimals = meaning_decimals(self.step_y, 1).max(meaning_decimals(self.step_x, 1));
        round_decimals(row as f64 * self.step_y + col as f64 * self.step_x, decimals)
    }

    /// Every row of the table.
    pub fn table(&self) -> Vec<LaplaceRow> {
        let offsets = self.col_arguments();
        self.row_arguments()
            .into_iter()
            .map(|argument| LaplaceRow {
                argument,
                values: offsets.iter().map(|dx| laplace(argument + dx)).collect(),
            })
            .collect()
    }

    /// The `n` cell arguments whose values are closest to `p`, closest first.
    pub fn nearest_arguments(&self, p: f64, n: usize) -> Vec<f64> {
        let mut cells: Vec<(f64, f64)> = (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .map(|(row, col)| {
                let argument = self.argument(row, col);
                ((laplace(argument) - p).abs(), argument)
            })
            .collect();
        cells.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        cells.into_iter().take(n).map(|(_, argument)| argument).collect()
    }

    /// `n` evenly spaced confidence levels within `±dev` (relative) of
    /// `center`, clamped to `[0, 1]`, each paired with its [`z_score`].
    pub fn tabulate_around(center: f64, dev: f64, n: usize) -> Vec<(f64, f64)> {
        let low = (center * (1.0 - dev)).max(0.0);
        let high = (center * (1.0 + dev)).min(1.0);
        match n {
            0 => Vec::new(),
            1 => vec![(low, z_score(low))],
            _ => (0..n)
                .map(|i| {
                    let level = low + (high - low) * i as f64 / (n - 1) as f64;
                    (level, z_score(level))
                })
                .collect(),
        }
    }
}

fn axis(count: usize, step: f64) -> Vec<f64> {
    let decimals = meaning_decimals(step, 1);
    (0..count)
        .map(|i| round_decimals(i as f64 * step, decimals))
        .collect()
}
