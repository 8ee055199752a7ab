// Copyright (C) 2020 Kevin Del Castillo Ramírez
//
// This file is part of recommend.
//
// recommend is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// recommend is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with recommend.  If not, see <http://www.gnu.org/licenses/>.

use super::Estimator;
use crate::{
    error::ErrorKind,
    neighbor::{k_nearest, Neighbor},
    similarity::SimilarityMatrix,
    training_data::{Basis, TrainingData},
    utils::{co_rated_values, mean, WeightedMean},
};

// Distance under which a rating difference agrees with an offset
const AGREEMENT_THRESHOLD: f64 = 0.5;

/// Every rater `x` of `y0` (but `x0`) that shares enough ratings with `x0`,
/// along with its rating of `y0` and the differences `x0_j - x_j`
fn clone_candidates(
    data: &TrainingData,
    basis: Basis,
    (x0, y0): (usize, usize),
    min_support: usize,
) -> Vec<(usize, f64, Vec<f64>)> {
    let target = data.x_row(basis, x0);
    let min_support = min_support.max(1);

    data.yr(basis)[y0]
        .iter()
        .filter(|(x, _)| *x != x0)
        .filter_map(|&(x, r)| {
            let diffs: Vec<f64> = co_rated_values(target, data.x_row(basis, x), Some(y0))
                .into_iter()
                .map(|(a, b)| a - b)
                .collect();

            if diffs.len() >= min_support {
                Some((x, r, diffs))
            } else {
                None
            }
        })
        .collect()
}

/// Tries every integer offset on every candidate, the offsets most of the
/// co-rated differences agree with win.
pub struct CloneBruteforce {
    basis: Basis,
    min_support: usize,
}

impl CloneBruteforce {
    pub fn new(basis: Basis, min_support: usize) -> Self {
        Self { basis, min_support }
    }
}

impl Estimator for CloneBruteforce {
    fn estimate(&mut self, data: &TrainingData, user: usize, item: usize) -> Result<f64, ErrorKind> {
        let xy = self.basis.orient(user, item);
        let span = data.scale().span().ceil() as i64;

        let mut best = 0.0;
        let mut estimates = Vec::new();

        for (_, r, diffs) in clone_candidates(data, self.basis, xy, self.min_support) {
            for offset in (-span..=span).map(|o| o as f64) {
                let agreeing = diffs
                    .iter()
                    .filter(|d| (*d - offset).abs() <= AGREEMENT_THRESHOLD)
                    .count();
                let agreement = agreeing as f64 / diffs.len() as f64;

                if agreeing == 0 || agreement < best {
                    continue;
                }

                if agreement > best {
                    best = agreement;
                    estimates.clear();
                }
                estimates.push(r + offset);
            }
        }

        mean(estimates).ok_or(ErrorKind::NoMatchingRatings)
    }
}

/// Candidates rating the most consistently around their mean difference win
pub struct CloneMeanDiff {
    basis: Basis,
    min_support: usize,
}

impl CloneMeanDiff {
    pub fn new(basis: Basis, min_support: usize) -> Self {
        Self { basis, min_support }
    }
}

impl Estimator for CloneMeanDiff {
    fn estimate(&mut self, data: &TrainingData, user: usize, item: usize) -> Result<f64, ErrorKind> {
        let xy = self.basis.orient(user, item);

        let mut best = f64::INFINITY;
        let mut estimates = Vec::new();

        for (_, r, diffs) in clone_candidates(data, self.basis, xy, self.min_support) {
            let offset = match mean(diffs.iter().copied()) {
                Some(offset) => offset,
                None => continue,
            };
            let dispersion = diffs.iter().map(|d| (d - offset).powi(2)).sum::<f64>()
                / diffs.len() as f64;

            if dispersion > best {
                continue;
            }

            if dispersion < best {
                best = dispersion;
                estimates.clear();
            }
            estimates.push(r + offset);
        }

        mean(estimates).ok_or(ErrorKind::NoMatchingRatings)
    }
}

/// Similarity weighted mean of `r(x, y0) + mean difference` over the `k`
/// most similar candidates.
pub struct CloneKnnMeanDiff {
    basis: Basis,
    k: usize,
    min_support: usize,
    similarities: SimilarityMatrix,
}

impl CloneKnnMeanDiff {
    pub fn new(basis: Basis, k: usize, min_support: usize, similarities: SimilarityMatrix) -> Self {
        Self {
            basis,
            k,
            min_support,
            similarities,
        }
    }
}

impl Estimator for CloneKnnMeanDiff {
    fn estimate(&mut self, data: &TrainingData, user: usize, item: usize) -> Result<f64, ErrorKind> {
        let (x0, y0) = self.basis.orient(user, item);

        // The rating carries the offset already applied
        let candidates = clone_candidates(data, self.basis, (x0, y0), self.min_support)
            .into_iter()
            .filter_map(|(x, r, diffs)| {
                let offset = mean(diffs)?;
                Some(Neighbor::new(x, self.similarities.get(x0, x), r + offset))
            })
            .filter(|neighbor| neighbor.sim > 0.0);

        let neighbors = k_nearest(candidates, self.k);
        if neighbors.is_empty() {
            return Err(ErrorKind::EmptyKNearestNeighbors);
        }

        let mut acc = WeightedMean::new();
        for n in &neighbors {
            acc.add(n.sim, n.rating);
        }

        acc.value().ok_or(ErrorKind::DivisionByZero)
    }
}
