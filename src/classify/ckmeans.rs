//! Optimal 1-D k-means (ckmeans) over sorted data.
//!
//! The dynamic program runs over the *distinct* finite values, each weighted by its
//! multiplicity, so equal values can never straddle a class boundary and the resulting
//! breaks are strictly ascending. Row `c` of the table holds the minimal total
//! within-class sum of squares for putting distinct values `0..=i` into `c + 1` classes.
//! Each row is filled by divide and conquer, relying on the optimal split point being
//! monotone in `i`, which gives O(k·m·log m) time and O(k·m) memory for `m` distinct values
//! (the plain fill is O(k·m²)).

use super::ClassifyError;

/// Distinct sorted values with multiplicities and shifted prefix sums for O(1) interval cost.
struct Weighted {
    values: Vec<f64>,
    weight: Vec<f64>, // prefix sums, len = m + 1
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl Weighted {
    /// Collects finite values, sorts them and merges duplicates.
    fn new(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mut distinct: Vec<(f64, usize)> = Vec::new();
        for v in sorted {
            match distinct.last_mut() {
                Some((last, count)) if *last == v => *count += 1,
                _ => distinct.push((v, 1)),
            }
        }

        // Shift by the median distinct value to limit cancellation in `sum_sq`, and divide
        // by the largest magnitude so squares of huge finite values stay finite.
        // Both transforms keep the optimal partition unchanged.
        let shift = distinct.get(distinct.len() / 2).map_or(0.0, |&(v, _)| v);
        let scale = distinct.iter().fold(0.0_f64, |m, &(v, _)| m.max(v.abs()));
        let scale = if scale > 0.0 { scale } else { 1.0 };

        let m = distinct.len();
        let mut weight = Vec::with_capacity(m + 1);
        let mut sum = Vec::with_capacity(m + 1);
        let mut sum_sq = Vec::with_capacity(m + 1);
        let (mut w, mut s, mut q) = (0.0, 0.0, 0.0);
        weight.push(w);
        sum.push(s);
        sum_sq.push(q);
        for &(v, count) in &distinct {
            let n = count as f64;
            let x = v / scale - shift / scale;
            w += n;
            s += n * x;
            q += n * x * x;
            weight.push(w);
            sum.push(s);
            sum_sq.push(q);
        }

        Self { values: distinct.into_iter().map(|(v, _)| v).collect(), weight, sum, sum_sq }
    }

    #[inline]
    fn len(&self) -> usize { self.values.len() }

    /// Sum of squared deviations from the mean for distinct values `j..=i`.
    #[inline]
    fn ssq(&self, j: usize, i: usize) -> f64 {
        let w = self.weight[i + 1] - self.weight[j];
        let s = self.sum[i + 1] - self.sum[j];
        let q = self.sum_sq[i + 1] - self.sum_sq[j];
        (q - s * s / w).max(0.0)
    }

    /// Fill `cur[imin..=imax]` for one row, searching split points in `jmin..=jmax`.
    fn fill_row(&self, prev: &[f64], cur: &mut [f64], back: &mut [usize], imin: usize, imax: usize, jmin: usize, jmax: usize) {
        if imin > imax { return }

        let i = imin + (imax - imin) / 2;
        let mut best = f64::INFINITY;
        let mut best_j = jmin;
        for j in jmin..=jmax.min(i) {
            let cost = prev[j - 1] + self.ssq(j, i);
            if cost < best {
                best = cost;
                best_j = j;
            }
        }
        cur[i] = best;
        back[i] = best_j;

        if i > imin { self.fill_row(prev, cur, back, imin, i - 1, jmin, best_j) }
        self.fill_row(prev, cur, back, i + 1, imax, best_j, jmax);
    }

    /// Start index (into `values`) of each class after the first.
    fn class_starts(&self, k: usize) -> Vec<usize> {
        let m = self.len();
        let mut cost = vec![vec![f64::INFINITY; m]; k];
        let mut back = vec![vec![0usize; m]; k];

        for i in 0..m { cost[0][i] = self.ssq(0, i) }
        for c in 1..k {
            let (done, rest) = cost.split_at_mut(c);
            self.fill_row(&done[c - 1], &mut rest[0], &mut back[c], c, m - 1, c, m - 1);
        }

        let mut starts = vec![0usize; k - 1];
        let mut i = m - 1;
        for c in (1..k).rev() {
            let j = back[c][i];
            starts[c - 1] = j;
            i = j - 1;
        }
        starts
    }
}

fn check(weighted: &Weighted, num_classes: usize) -> Result<(), ClassifyError> {
    if num_classes == 0 { return Err(ClassifyError::InvalidClassCount) }
    if weighted.len() < num_classes {
        return Err(ClassifyError::InsufficientData { distinct: weighted.len(), requested: num_classes });
    }
    Ok(())
}

/// Natural-breaks thresholds for `values` split into `num_classes` classes.
///
/// Non-finite entries are ignored. The result has `num_classes - 1` strictly ascending
/// entries: the minimum of every class except the first.
pub fn compute_breaks(values: &[f64], num_classes: usize) -> Result<Vec<f64>, ClassifyError> {
    let weighted = Weighted::new(values);
    check(&weighted, num_classes)?;
    if num_classes == 1 { return Ok(Vec::new()) }

    Ok(weighted.class_starts(num_classes).into_iter().map(|j| weighted.values[j]).collect())
}

/// The clusters themselves: finite values sorted ascending, grouped by class.
pub fn ckmeans(values: &[f64], num_classes: usize) -> Result<Vec<Vec<f64>>, ClassifyError> {
    let breaks = compute_breaks(values, num_classes)?;

    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut clusters = vec![Vec::new(); num_classes];
    for v in sorted {
        clusters[breaks.partition_point(|t| *t <= v)].push(v);
    }
    Ok(clusters)
}
