// Ranking and order statistics over score columns.

use std::cmp::Ordering;

/// Competition ("min") ranks, highest value first: ties share the lowest
/// rank and the following rank is skipped (1, 2, 2, 4).
pub fn min_rank_desc(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut ranks = vec![0; values.len()];
    let mut prev: Option<(f64, usize)> = None;
    for (pos, &i) in order.iter().enumerate() {
        let rank = match prev {
            Some((v, r)) if v.total_cmp(&values[i]) == Ordering::Equal => r,
            _ => pos + 1,
        };
        ranks[i] = rank;
        prev = Some((values[i], rank));
    }
    ranks
}

/// Percentile rank in (0, 100]: ascending average rank over N, times 100.
/// Tied values share the mean of the ranks they span.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut pct = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]].total_cmp(&values[order[start]]) == Ordering::Equal {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let avg_rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            pct[i] = avg_rank / n as f64 * 100.0;
        }
        start = end;
    }
    pct
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}
