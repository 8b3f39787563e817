// Statistical primitives for group comparisons
//
// Rank-based and contingency-table tests used by the significance tester,
// plus the rank-sum form of ROC AUC used by the predictive analysis.
//
// - Mann-Whitney U: exact null distribution for small tie-free samples,
//   otherwise the normal approximation with tie and continuity correction
// - Pearson chi-square on a 2x2 table with Yates' continuity correction
// - Tail probabilities come from libm::erfc
// - Score summaries use trueno::Vector (SIMD mean/stddev/min/max) and
//   aprender::stats::DescriptiveStats for the median

use aprender::stats::DescriptiveStats;
use serde::Serialize;
use std::f64::consts::SQRT_2;
use trueno::Vector;

/// Largest per-group size for which the exact U distribution is used
const EXACT_MAX_GROUP_SIZE: usize = 8;

/// Statistic and two-sided p-value of a hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

/// Descriptive summary of a score distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub mean: f32,
    pub stddev: f32,
    pub min: f32,
    pub max: f32,
    pub median: f32,
}

/// Average (fractional) ranks, 1-based, plus the tie term Σ(t³ − t)
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j share the mean of ranks i+1..=j+1
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        i = j + 1;
    }

    (ranks, tie_term)
}

/// Upper tail of the standard normal distribution
pub fn normal_sf(z: f64) -> f64 {
    0.5 * libm::erfc(z / SQRT_2)
}

/// Upper tail of the chi-square distribution with one degree of freedom
pub fn chi2_sf_one_df(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    libm::erfc((x / 2.0).sqrt())
}

/// Two-sided Mann-Whitney U test
///
/// The statistic is U for `x`. Returns p = 1 when either sample is empty or
/// all pooled values are equal.
///
/// # Example
/// ```
/// use fairaudit::fairness::statistics::mann_whitney_u;
///
/// let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
/// assert_eq!(result.statistic, 0.0);
/// assert!((result.p_value - 0.1).abs() < 1e-12);
/// ```
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> TestOutcome {
    let n1 = x.len();
    let n2 = y.len();
    if n1 == 0 || n2 == 0 {
        return TestOutcome {
            statistic: 0.0,
            p_value: 1.0,
        };
    }

    let pooled: Vec<f64> = x.iter().chain(y.iter()).copied().collect();
    let (ranks, tie_term) = average_ranks(&pooled);

    let (nx, ny) = (n1 as f64, n2 as f64);
    let rank_sum_x: f64 = ranks[..n1].iter().sum();
    let u1 = rank_sum_x - nx * (nx + 1.0) / 2.0;
    let u2 = nx * ny - u1;
    let u_max = u1.max(u2);

    let p_value = if tie_term == 0.0 && n1 <= EXACT_MAX_GROUP_SIZE && n2 <= EXACT_MAX_GROUP_SIZE {
        2.0 * exact_u_sf(n1, n2, u_max.round() as usize)
    } else {
        let n = nx + ny;
        let mean = nx * ny / 2.0;
        let variance = nx * ny / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
        if variance <= 0.0 {
            1.0
        } else {
            let z = (u_max - mean - 0.5) / variance.sqrt();
            2.0 * normal_sf(z)
        }
    };

    TestOutcome {
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
    }
}

/// P(U >= u) under the null for sample sizes (m, n), no ties
fn exact_u_sf(m: usize, n: usize, u: usize) -> f64 {
    let max_u = m * n;
    if u > max_u {
        return 0.0;
    }

    // counts[i][j][k]: arrangements of i x-values and j y-values with U = k
    let mut counts = vec![vec![Vec::<f64>::new(); n + 1]; m + 1];
    for i in 0..=m {
        for j in 0..=n {
            let mut dist = vec![0.0; i * j + 1];
            if i == 0 || j == 0 {
                dist[0] = 1.0;
            } else {
                // largest value is an x (adds j to U) or a y (adds nothing)
                for (k, &c) in counts[i - 1][j].iter().enumerate() {
                    dist[k + j] += c;
                }
                for (k, &c) in counts[i][j - 1].iter().enumerate() {
                    dist[k] += c;
                }
            }
            counts[i][j] = dist;
        }
    }

    let dist = &counts[m][n];
    let total: f64 = dist.iter().sum();
    dist[u..].iter().sum::<f64>() / total
}

/// Pearson chi-square test on a 2x2 table with Yates' correction
///
/// Rows are groups, columns are outcome categories. When any expected count
/// is zero the table carries no evidence of a difference and the result is
/// statistic 0, p = 1.
pub fn chi2_contingency_2x2(table: [[f64; 2]; 2]) -> TestOutcome {
    let row_sums = [table[0][0] + table[0][1], table[1][0] + table[1][1]];
    let col_sums = [table[0][0] + table[1][0], table[0][1] + table[1][1]];
    let total = row_sums[0] + row_sums[1];

    let mut statistic = 0.0;
    for (i, row) in table.iter().enumerate() {
        for (j, &observed) in row.iter().enumerate() {
            let expected = if total > 0.0 {
                row_sums[i] * col_sums[j] / total
            } else {
                0.0
            };
            if expected == 0.0 {
                return TestOutcome {
                    statistic: 0.0,
                    p_value: 1.0,
                };
            }
            let diff = expected - observed;
            let corrected = observed + diff.signum() * diff.abs().min(0.5);
            statistic += (corrected - expected).powi(2) / expected;
        }
    }

    TestOutcome {
        statistic,
        p_value: chi2_sf_one_df(statistic),
    }
}

/// ROC AUC via the rank-sum identity AUC = U / (n_pos * n_neg)
///
/// Returns `None` unless both label classes are present.
pub fn roc_auc(scores: &[f64], labels: &[bool]) -> Option<f64> {
    debug_assert_eq!(scores.len(), labels.len());
    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let (ranks, _) = average_ranks(scores);
    let rank_sum_pos: f64 = ranks
        .iter()
        .zip(labels)
        .filter(|(_, l)| **l)
        .map(|(r, _)| r)
        .sum();
    let (p, n) = (n_pos as f64, n_neg as f64);
    let u = rank_sum_pos - p * (p + 1.0) / 2.0;
    Some(u / (p * n))
}

/// Summarize scores using Trueno for SIMD-accelerated moments
pub fn summarize_scores(scores: &[f64]) -> Option<ScoreSummary> {
    if scores.is_empty() {
        return None;
    }

    let values: Vec<f32> = scores.iter().map(|&s| s as f32).collect();
    let v = Vector::from_slice(&values);

    let finite = |x: f32| if x.is_finite() { x } else { 0.0 };
    let mean = finite(v.mean().unwrap_or(0.0));
    let stddev = finite(v.stddev().unwrap_or(0.0));
    let min = finite(v.min().unwrap_or(0.0));
    let max = finite(v.max().unwrap_or(0.0));
    let median = DescriptiveStats::new(&v).quantile(0.5).map(finite).unwrap_or(mean);

    Some(ScoreSummary {
        mean,
        stddev,
        min,
        max,
        median,
    })
}
