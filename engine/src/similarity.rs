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

use crate::{
    error::ErrorKind,
    options::Measure,
    training_data::{Basis, TrainingData},
    utils::co_rated_values,
};
use num_traits::float::Float;
use std::{ops::AddAssign, time::Instant};

fn checked<V: Float>(value: V) -> Result<V, ErrorKind> {
    if value.is_nan() {
        Err(ErrorKind::IndeterminateForm)
    } else if value.is_infinite() {
        Err(ErrorKind::DivisionByZero)
    } else {
        Ok(value)
    }
}

fn count<V: Float>(n: usize) -> Result<V, ErrorKind> {
    V::from(n).ok_or(ErrorKind::NoMatchingRatings)
}

pub fn cosine<V>(pairs: &[(V, V)]) -> Result<V, ErrorKind>
where
    V: Float + AddAssign,
{
    let mut dot_prod = None;
    let mut norm_a = V::zero();
    let mut norm_b = V::zero();

    for &(x, y) in pairs {
        *dot_prod.get_or_insert_with(V::zero) += x * y;
        norm_a += x.powi(2);
        norm_b += y.powi(2);
    }

    let dot_prod = dot_prod.ok_or(ErrorKind::NoMatchingRatings)?;
    checked(dot_prod / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Centers both sides on their means over the co-rated entries only
pub fn pearson<V>(pairs: &[(V, V)]) -> Result<V, ErrorKind>
where
    V: Float + AddAssign,
{
    if pairs.is_empty() {
        return Err(ErrorKind::NoMatchingRatings);
    }

    let n = count::<V>(pairs.len())?;
    let mut mean_x = V::zero();
    let mut mean_y = V::zero();
    for &(x, y) in pairs {
        mean_x += x;
        mean_y += y;
    }
    let mean_x = mean_x / n;
    let mean_y = mean_y / n;

    let mut cov = V::zero();
    let mut std_dev_a = V::zero();
    let mut std_dev_b = V::zero();
    for &(x, y) in pairs {
        cov += (x - mean_x) * (y - mean_y);
        std_dev_a += (x - mean_x).powi(2);
        std_dev_b += (y - mean_y).powi(2);
    }

    checked(cov / (std_dev_a.sqrt() * std_dev_b.sqrt()))
}

pub fn msd<V>(pairs: &[(V, V)]) -> Result<V, ErrorKind>
where
    V: Float + AddAssign,
{
    let mut sum = None;
    for &(x, y) in pairs {
        *sum.get_or_insert_with(V::zero) += (x - y).powi(2);
    }

    let sum = sum.ok_or(ErrorKind::NoMatchingRatings)?;
    let msd = sum / count(pairs.len())?;
    checked(V::one() / (V::one() + msd))
}

/// Like `msd`, but the mean offset between both sides is removed first, two
/// entities rating with a constant offset are exact clones.
pub fn msd_clone<V>(pairs: &[(V, V)]) -> Result<V, ErrorKind>
where
    V: Float + AddAssign,
{
    let offset = mean_diff(pairs)?;

    let mut sum = V::zero();
    for &(x, y) in pairs {
        sum += (x - y - offset).powi(2);
    }

    let msd = sum / count(pairs.len())?;
    checked(V::one() / (V::one() + msd))
}

/// Mean of `a - b` over the co-rated entries
pub fn mean_diff<V>(pairs: &[(V, V)]) -> Result<V, ErrorKind>
where
    V: Float + AddAssign,
{
    let mut sum = None;
    for &(x, y) in pairs {
        *sum.get_or_insert_with(V::zero) += x - y;
    }

    let sum = sum.ok_or(ErrorKind::NoMatchingRatings)?;
    Ok(sum / count(pairs.len())?)
}

pub fn similarity<V>(pairs: &[(V, V)], measure: Measure) -> Result<V, ErrorKind>
where
    V: Float + AddAssign,
{
    match measure {
        Measure::Cosine => cosine(pairs),
        Measure::Pearson => pearson(pairs),
        Measure::Msd => msd(pairs),
        Measure::MsdClone => msd_clone(pairs),
    }
}

/// Dense symmetric similarities between every pair of `x` entities.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    measure: Measure,
    values: Vec<f64>,
    support: Vec<usize>,
}

impl SimilarityMatrix {
    /// Quadratic in the number of entities, compute it once per training set.
    ///
    /// Pairs of distinct entities with less than `min_support` co-rated
    /// entries (or none at all) get a similarity of 0, as do pairs the
    /// measure can't handle (ex. pearson over constant ratings). The diagonal
    /// is 1 for every entity that rated something.
    pub fn compute(
        data: &TrainingData,
        measure: Measure,
        basis: Basis,
        min_support: usize,
    ) -> Self {
        let now = Instant::now();
        let n = data.n_x(basis);

        let mut values = vec![0.0; n * n];
        let mut support = vec![0; n * n];

        for a in 0..n {
            let row_a = data.x_row(basis, a);
            if !row_a.is_empty() {
                values[a * n + a] = 1.0;
            }
            support[a * n + a] = row_a.len();

            for b in (a + 1)..n {
                let pairs = co_rated_values(row_a, data.x_row(basis, b), None);
                let shared = pairs.len();

                let sim = if shared == 0 || shared < min_support {
                    0.0
                } else {
                    similarity(&pairs, measure).unwrap_or(0.0)
                };

                values[a * n + b] = sim;
                values[b * n + a] = sim;
                support[a * n + b] = shared;
                support[b * n + a] = shared;
            }
        }

        log::debug!(
            "Computed {} similarities between {} {}s in {:?}",
            measure,
            n,
            basis.name(),
            now.elapsed()
        );

        Self {
            n,
            measure,
            values,
            support,
        }
    }

    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.values[a * self.n + b]
    }

    /// Number of co-rated entries between `a` and `b`
    pub fn support(&self, a: usize, b: usize) -> usize {
        self.support[a * self.n + b]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn row(&self, a: usize) -> &[f64] {
        &self.values[a * self.n..(a + 1) * self.n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use assert_approx_eq::*;
    use controller::{RatingScale, RawRating};

    // a and b rate with a constant offset of 1 per item and a scale of 2,
    // c rates in reverse, d only shares one item
    fn toy() -> Result<TrainingData, ErrorKind> {
        let ratings = vec![
            RawRating::new("a", "i0", 1.0),
            RawRating::new("a", "i1", 2.0),
            RawRating::new("a", "i2", 3.0),
            RawRating::new("b", "i0", 2.0),
            RawRating::new("b", "i1", 4.0),
            RawRating::new("b", "i2", 6.0),
            RawRating::new("c", "i0", 3.0),
            RawRating::new("c", "i1", 2.0),
            RawRating::new("c", "i2", 1.0),
            RawRating::new("d", "i2", 5.0),
        ];

        TrainingData::build(&ratings, RatingScale::new(1.0, 6.0))
    }

    #[test]
    fn measures() -> Result<(), Error> {
        let pairs = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];

        assert_approx_eq!(cosine(&pairs)?, 1.0);
        assert_approx_eq!(pearson(&pairs)?, 1.0);
        assert_approx_eq!(msd(&pairs)?, 3.0 / 17.0);
        assert_approx_eq!(msd_clone(&pairs)?, 0.6);
        assert_approx_eq!(mean_diff(&pairs)?, -2.0);

        let reversed = [(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)];
        assert_approx_eq!(pearson(&reversed)?, -1.0);

        Ok(())
    }

    #[test]
    fn constant_offset_is_a_perfect_clone() -> Result<(), Error> {
        let pairs = [(1.0f32, 3.0), (4.0, 6.0), (2.0, 4.0)];

        assert_approx_eq!(msd_clone(&pairs)?, 1.0f32);
        assert!(msd(&pairs)? < 1.0);

        Ok(())
    }

    #[test]
    fn degenerate_pairs() {
        let empty: [(f64, f64); 0] = [];
        assert!(matches!(cosine(&empty), Err(ErrorKind::NoMatchingRatings)));
        assert!(matches!(pearson(&empty), Err(ErrorKind::NoMatchingRatings)));
        assert!(matches!(msd(&empty), Err(ErrorKind::NoMatchingRatings)));

        let constant = [(3.0, 1.0), (3.0, 5.0)];
        assert!(matches!(pearson(&constant), Err(ErrorKind::IndeterminateForm)));

        let zeros = [(0.0, 1.0)];
        assert!(cosine(&zeros).is_err());
    }

    #[test]
    fn self_similarity_is_one() -> Result<(), Error> {
        let data = toy()?;

        for measure in [Measure::Cosine, Measure::Pearson, Measure::Msd, Measure::MsdClone].iter() {
            let matrix = SimilarityMatrix::compute(&data, *measure, Basis::User, 1);
            for a in 0..matrix.len() {
                assert_approx_eq!(matrix.get(a, a), 1.0);
            }
        }

        Ok(())
    }

    #[test]
    fn user_matrix() -> Result<(), Error> {
        let data = toy()?;
        let matrix = SimilarityMatrix::compute(&data, Measure::Pearson, Basis::User, 1);

        let a = data.to_inner("a", crate::training_data::Kind::User)?;
        let b = data.to_inner("b", crate::training_data::Kind::User)?;
        let c = data.to_inner("c", crate::training_data::Kind::User)?;
        let d = data.to_inner("d", crate::training_data::Kind::User)?;

        assert_eq!(matrix.len(), 4);
        assert_approx_eq!(matrix.get(a, b), 1.0);
        assert_approx_eq!(matrix.get(a, c), -1.0);
        assert_approx_eq!(matrix.get(c, a), matrix.get(a, c));
        assert_eq!(matrix.support(a, b), 3);
        assert_eq!(matrix.support(a, d), 1);

        // A single co-rated entry has no variance
        assert_approx_eq!(matrix.get(a, d), 0.0);

        Ok(())
    }

    #[test]
    fn min_support_zeroes_pairs() -> Result<(), Error> {
        let data = toy()?;

        for measure in [Measure::Cosine, Measure::Pearson, Measure::Msd, Measure::MsdClone].iter() {
            let matrix = SimilarityMatrix::compute(&data, *measure, Basis::User, 2);
            assert_eq!(matrix.support(0, 3), 1);
            assert!(matrix.get(0, 3) == 0.0);
            assert!(matrix.get(3, 0) == 0.0);
            assert!(matrix.get(0, 1) != 0.0);

            let matrix = SimilarityMatrix::compute(&data, *measure, Basis::User, 4);
            for a in 0..matrix.len() {
                for b in 0..matrix.len() {
                    if a != b {
                        assert!(matrix.get(a, b) == 0.0);
                    }
                }
            }
        }

        Ok(())
    }

    #[test]
    fn item_matrix() -> Result<(), Error> {
        let data = toy()?;
        let matrix = SimilarityMatrix::compute(&data, Measure::Cosine, Basis::Item, 1);

        assert_eq!(matrix.len(), data.n_items());
        assert_eq!(matrix.support(0, 1), 3);
        assert_eq!(matrix.support(0, 2), 3);
        assert_eq!(matrix.support(2, 2), 4);
        assert_eq!(matrix.row(1).len(), 3);
        assert_eq!(matrix.measure(), Measure::Cosine);

        Ok(())
    }
}
