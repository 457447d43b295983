use crate::detection::{Detection, ObjectClass};
use nalgebra::{distance, Point2};
use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;
use rayon::prelude::*;

const F32_I64_MULT: f32 = 1_000_000.0;

/// Cell count above which the cost matrix rows are filled in parallel. The
/// parallel build is outcome-identical to the serial one.
const PARALLEL_BUILD_THRESHOLD: usize = 4096;

/// Row-major matrix of association costs, tracks in rows and detections in
/// columns. Cross-class pairs and pairs farther apart than `max_distance`
/// are infinity.
///
pub(crate) fn build_cost_matrix(
    tracks: &[(Point2<f32>, ObjectClass)],
    detections: &[Detection],
    max_distance: f32,
) -> Vec<f32> {
    if tracks.is_empty() || detections.is_empty() {
        return Vec::default();
    }

    let cols = detections.len();
    let mut costs = vec![f32::INFINITY; tracks.len() * cols];

    if tracks.len() * cols >= PARALLEL_BUILD_THRESHOLD {
        costs
            .par_chunks_mut(cols)
            .zip(tracks.par_iter())
            .for_each(|(row, track)| fill_row(row, track, detections, max_distance));
    } else {
        for (row, track) in costs.chunks_mut(cols).zip(tracks.iter()) {
            fill_row(row, track, detections, max_distance);
        }
    }
    costs
}

fn fill_row(
    row: &mut [f32],
    (center, object_class): &(Point2<f32>, ObjectClass),
    detections: &[Detection],
    max_distance: f32,
) {
    for (j, detection) in detections.iter().enumerate() {
        if *object_class == detection.object_class() {
            let d = distance(center, &detection.center());
            if d < max_distance {
                row[j] = d;
            }
        }
    }
}

/// Greedy matching: repeatedly commit the globally cheapest remaining cell,
/// then invalidate its row and column. Ties break towards the first cell in
/// row-major order, which makes the result deterministic. Not a globally
/// optimal matching.
///
pub(crate) fn solve_greedy(mut costs: Vec<f32>, rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::default();

    for _ in 0..rows.min(cols) {
        let mut best_cost = f32::INFINITY;
        let mut best_cell = None;
        for (idx, &cost) in costs.iter().enumerate() {
            if cost < best_cost {
                best_cost = cost;
                best_cell = Some(idx);
            }
        }

        let Some(cell) = best_cell else {
            break;
        };
        let (row, col) = (cell / cols, cell % cols);
        pairs.push((row, col));

        for j in 0..cols {
            costs[row * cols + j] = f32::INFINITY;
        }
        for i in 0..rows {
            costs[i * cols + col] = f32::INFINITY;
        }
    }
    pairs
}

/// Minimum-cost bipartite matching over the same gated matrix.
///
/// Distances are scaled to negated integer weights so Kuhn-Munkres, a
/// maximizer, minimizes the total distance. Every track row gets a private
/// fallback column priced at `max_distance`, which lets the solver leave a
/// track unmatched instead of forcing an infeasible pair; fallback and
/// infeasible assignments are filtered from the result.
///
pub(crate) fn solve_hungarian(
    costs: &[f32],
    rows: usize,
    cols: usize,
    max_distance: f32,
) -> Vec<(usize, usize)> {
    if rows == 0 || cols == 0 {
        return Vec::default();
    }

    let unmatched = -(max_distance * F32_I64_MULT) as i64;
    let infeasible = unmatched * 2;

    let mut weights = Matrix::new(rows, cols + rows, infeasible);
    for row in 0..rows {
        for col in 0..cols {
            let cost = costs[row * cols + col];
            if cost.is_finite() {
                weights[(row, col)] = -(cost * F32_I64_MULT) as i64;
            }
        }
        weights[(row, cols + row)] = unmatched;
    }

    let (_, solution) = kuhn_munkres(&weights);
    solution
        .into_iter()
        .enumerate()
        .filter(|&(row, col)| col < cols && costs[row * cols + col].is_finite())
        .collect()
}
