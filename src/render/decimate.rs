//! Reduces a sampled series to a drawable number of points.
//!
//! A 20000-sample curve drawn into an 800 pixel wide panel wastes most of its
//! vertices. Each run of finite samples is cut into buckets and only the
//! minimum and maximum of each bucket are kept, in sample order, so a spike
//! that occupies a single sample still reaches the drawing. Non-finite
//! samples end a run: the drawn line has a gap there instead of a jump.

use itertools::{Itertools, MinMaxResult};

/// A point in data coordinates.
pub type Point = (f64, f64);

/// Splits `(xs, ys)` into runs of finite points and decimates each run so the
/// total stays near `max_points`.
///
/// Returns one polyline per run; every run is allowed at least two points.
pub fn decimate(xs: &[f64], ys: &[f64], max_points: usize) -> Vec<Vec<Point>> {
    let runs = finite_runs(xs, ys);
    let total: usize = runs.iter().map(Vec::len).sum();
    if total <= max_points {
        return runs;
    }

    runs.into_iter()
        .map(|run| {
            let budget = (max_points * run.len() / total).max(2);
            min_max_buckets(run, budget)
        })
        .collect()
}

/// Groups consecutive finite points, dropping the non-finite ones between them.
fn finite_runs(xs: &[f64], ys: &[f64]) -> Vec<Vec<Point>> {
    let chunks = xs
        .iter()
        .copied()
        .zip(ys.iter().copied())
        .chunk_by(|(x, y)| x.is_finite() && y.is_finite());

    let runs: Vec<Vec<Point>> = chunks
        .into_iter()
        .filter(|(finite, _)| *finite)
        .map(|(_, run)| run.collect())
        .collect();
    runs
}

fn min_max_buckets(run: Vec<Point>, budget: usize) -> Vec<Point> {
    if run.len() <= budget {
        return run;
    }

    let buckets = (budget / 2).max(1);
    let bucket_len = run.len().div_ceil(buckets);
    let mut kept = Vec::with_capacity(budget);

    for bucket in run.chunks(bucket_len) {
        match bucket.iter().position_minmax_by(|a, b| a.1.total_cmp(&b.1)) {
            MinMaxResult::NoElements => {}
            MinMaxResult::OneElement(i) => kept.push(bucket[i]),
            MinMaxResult::MinMax(min, max) => {
                let (first, second) = if min <= max { (min, max) } else { (max, min) };
                kept.push(bucket[first]);
                if second != first {
                    kept.push(bucket[second]);
                }
            }
        }
    }
    kept
}
