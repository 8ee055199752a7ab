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
    options::AnalogyOptions,
    training_data::{Basis, TrainingData},
    utils::mean,
};
use rand::{rngs::StdRng, seq::index::sample};
use std::cmp::Ordering;

// Two ratings are considered equal below this difference
const EQUALITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AnalogyRule {
    /// `a - b == c - x`, the closest parallelograms win
    Parall,
    /// `a : b :: c : x` over equal/different patterns, the best matching
    /// triples win
    Pattern,
}

/// Predicts by completing analogies `a : b :: c : x0` between raters of the
/// target `y0`.
pub struct Analogy {
    rule: AnalogyRule,
    basis: Basis,
    k: usize,
    options: AnalogyOptions,
    rng: StdRng,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    solution: f64,
    score: f64,
}

fn equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EQUALITY_THRESHOLD
}

/// The solution of `a : b :: c : ?` when the pattern allows one
fn solve_pattern(a: f64, b: f64, c: f64) -> Option<f64> {
    if equal(a, b) {
        Some(c)
    } else if equal(a, c) {
        Some(b)
    } else {
        None
    }
}

fn holds(a: f64, b: f64, c: f64, d: f64) -> bool {
    (equal(a, b) && equal(c, d)) || (equal(a, c) && equal(b, d))
}

impl Analogy {
    pub fn new(
        rule: AnalogyRule,
        basis: Basis,
        k: usize,
        options: AnalogyOptions,
        rng: StdRng,
    ) -> Self {
        Self {
            rule,
            basis,
            k,
            options,
            rng,
        }
    }

    /// Ordered triples of distinct indices in `[0, n)`, all of them if they
    /// fit in the sample budget, random ones otherwise
    fn triples(&mut self, n: usize) -> Vec<(usize, usize, usize)> {
        let total = n
            .saturating_mul(n.saturating_sub(1))
            .saturating_mul(n.saturating_sub(2));

        if total <= self.options.n_samples {
            let mut triples = Vec::with_capacity(total);
            for a in 0..n {
                for b in (0..n).filter(|b| *b != a) {
                    for c in (0..n).filter(|c| *c != a && *c != b) {
                        triples.push((a, b, c));
                    }
                }
            }

            triples
        } else {
            (0..self.options.n_samples)
                .map(|_| {
                    let picked = sample(&mut self.rng, n, 3).into_vec();
                    (picked[0], picked[1], picked[2])
                })
                .collect()
        }
    }

    /// Ratings of `a`, `b`, `c` and `x0` on everything `x0` rated but `y0`
    fn common(
        &self,
        data: &TrainingData,
        (x0, y0): (usize, usize),
        (a, b, c): (usize, usize, usize),
    ) -> Vec<[f64; 4]> {
        let (row_a, row_b, row_c) = (
            data.x_row(self.basis, a),
            data.x_row(self.basis, b),
            data.x_row(self.basis, c),
        );

        data.x_row(self.basis, x0)
            .ratings
            .iter()
            .filter(|(y, _)| *y != y0)
            .filter_map(|&(y, d)| Some([row_a.get(y)?, row_b.get(y)?, row_c.get(y)?, d]))
            .collect()
    }

    fn candidate(&self, (ra, rb, rc): (f64, f64, f64), common: &[[f64; 4]], data: &TrainingData) -> Option<Candidate> {
        let n = common.len() as f64;

        match self.rule {
            AnalogyRule::Parall => {
                let solution = rc - ra + rb;
                if !data.scale().contains(solution) {
                    return None;
                }

                let sq_sum: f64 = common
                    .iter()
                    .map(|[a, b, c, d]| ((a - b) - (c - d)).powi(2))
                    .sum();

                Some(Candidate {
                    solution,
                    score: (sq_sum / n).sqrt(),
                })
            }

            AnalogyRule::Pattern => {
                let solution = solve_pattern(ra, rb, rc)?;
                let matching = common
                    .iter()
                    .filter(|[a, b, c, d]| holds(*a, *b, *c, *d))
                    .count();

                if matching == 0 {
                    return None;
                }

                Some(Candidate {
                    solution,
                    score: matching as f64 / n,
                })
            }
        }
    }

    fn select(&self, mut candidates: Vec<Candidate>) -> Option<f64> {
        match self.rule {
            AnalogyRule::Parall => {
                // Lowest deviation first, the sort is stable so ties keep
                // the triple order
                candidates.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
                mean(candidates.iter().take(self.k).map(|c| c.solution))
            }

            AnalogyRule::Pattern => {
                let best = candidates
                    .iter()
                    .map(|c| c.score)
                    .fold(None, |best: Option<f64>, score| match best {
                        Some(best) if best >= score => Some(best),
                        _ => Some(score),
                    })?;

                mean(
                    candidates
                        .iter()
                        .filter(|c| c.score >= best)
                        .map(|c| c.solution),
                )
            }
        }
    }
}

impl Estimator for Analogy {
    fn estimate(&mut self, data: &TrainingData, user: usize, item: usize) -> Result<f64, ErrorKind> {
        let (x0, y0) = self.basis.orient(user, item);
        let raters: Vec<(usize, f64)> = data.yr(self.basis)[y0]
            .iter()
            .filter(|(x, _)| *x != x0)
            .copied()
            .collect();

        if raters.len() < 3 {
            return Err(ErrorKind::NoMatchingRatings);
        }

        let min_common = self.options.min_common.max(1);
        let mut candidates = Vec::new();

        for (ia, ib, ic) in self.triples(raters.len()) {
            let ((a, ra), (b, rb), (c, rc)) = (raters[ia], raters[ib], raters[ic]);

            let common = self.common(data, (x0, y0), (a, b, c));
            if common.len() < min_common {
                continue;
            }

            if let Some(candidate) = self.candidate((ra, rb, rc), &common, data) {
                candidates.push(candidate);
            }
        }

        log::trace!("{} analogy candidates for ({}, {})", candidates.len(), x0, y0);
        self.select(candidates).ok_or(ErrorKind::NoMatchingRatings)
    }
}
