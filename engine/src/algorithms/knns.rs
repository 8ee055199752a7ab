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
    baseline::Baselines,
    error::ErrorKind,
    neighbor::{k_nearest, Neighbor},
    similarity::SimilarityMatrix,
    training_data::{Basis, TrainingData},
    utils::WeightedMean,
};

pub enum KnnFlavor {
    /// Weighted mean of the neighbor ratings
    Basic,
    /// Works on ratings centered on each entity mean
    WithMeans,
    /// Works on the residuals left by the baselines
    Baseline(Baselines),
}

pub struct Knn {
    flavor: KnnFlavor,
    basis: Basis,
    k: usize,
    similarities: SimilarityMatrix,
}

impl Knn {
    pub fn new(flavor: KnnFlavor, basis: Basis, k: usize, similarities: SimilarityMatrix) -> Self {
        Self {
            flavor,
            basis,
            k,
            similarities,
        }
    }

    /// The `k` most similar entities that rated `y`, only positive
    /// similarities count
    pub fn neighbors(&self, data: &TrainingData, x0: usize, y0: usize) -> Vec<Neighbor> {
        let candidates = data.yr(self.basis)[y0]
            .iter()
            .filter(|(x, _)| *x != x0)
            .map(|&(x, r)| Neighbor::new(x, self.similarities.get(x0, x), r))
            .filter(|neighbor| neighbor.sim > 0.0);

        k_nearest(candidates, self.k)
    }
}

impl Estimator for Knn {
    fn estimate(&mut self, data: &TrainingData, user: usize, item: usize) -> Result<f64, ErrorKind> {
        let (x0, y0) = self.basis.orient(user, item);
        let neighbors = self.neighbors(data, x0, y0);

        if neighbors.is_empty() {
            return Err(ErrorKind::EmptyKNearestNeighbors);
        }

        let mut acc = WeightedMean::new();
        let offset = match &self.flavor {
            KnnFlavor::Basic => {
                for n in &neighbors {
                    acc.add(n.sim, n.rating);
                }
                0.0
            }

            KnnFlavor::WithMeans => {
                for n in &neighbors {
                    acc.add(n.sim, n.rating - data.x_mean(self.basis, n.id));
                }
                data.x_mean(self.basis, x0)
            }

            KnnFlavor::Baseline(baselines) => {
                for n in &neighbors {
                    acc.add(n.sim, n.rating - baselines.estimate_xy(self.basis, n.id, y0));
                }
                baselines.estimate_xy(self.basis, x0, y0)
            }
        };

        acc.value()
            .map(|value| offset + value)
            .ok_or(ErrorKind::DivisionByZero)
    }

    fn fallback(&self, data: &TrainingData, user: usize, item: usize) -> f64 {
        match &self.flavor {
            KnnFlavor::Baseline(baselines) => baselines.estimate(user, item),
            _ => data.global_mean(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{options::Measure, training_data::Kind};
    use anyhow::Error;
    use assert_approx_eq::*;
    use controller::{RatingScale, RawRating};

    // u0 is the target, u1 agrees with it, u2 rates everything one point
    // lower, u3 shares nothing with it
    fn toy() -> Result<TrainingData, ErrorKind> {
        let ratings = vec![
            RawRating::new("u0", "i0", 4.0),
            RawRating::new("u0", "i1", 2.0),
            RawRating::new("u1", "i0", 4.0),
            RawRating::new("u1", "i1", 2.0),
            RawRating::new("u1", "i2", 5.0),
            RawRating::new("u2", "i0", 3.0),
            RawRating::new("u2", "i1", 1.0),
            RawRating::new("u2", "i2", 3.0),
            RawRating::new("u3", "i3", 1.0),
            RawRating::new("u3", "i4", 1.0),
        ];

        TrainingData::build(&ratings, RatingScale::new(1.0, 5.0))
    }

    fn knn(data: &TrainingData, flavor: KnnFlavor, k: usize) -> Knn {
        let similarities = SimilarityMatrix::compute(data, Measure::Msd, Basis::User, 1);
        Knn::new(flavor, Basis::User, k, similarities)
    }

    #[test]
    fn basic_weighted_mean() -> Result<(), Error> {
        let data = toy()?;
        let u0 = data.to_inner("u0", Kind::User)?;
        let i2 = data.to_inner("i2", Kind::Item)?;

        // msd(u0, u1) = 1, msd(u0, u2) = 1/2
        let mut algo = knn(&data, KnnFlavor::Basic, 40);
        let neighbors = algo.neighbors(&data, u0, i2);
        assert_eq!(neighbors.len(), 2);
        assert_approx_eq!(neighbors[0].sim, 1.0);
        assert_approx_eq!(neighbors[1].sim, 0.5);

        let estimated = algo.estimate(&data, u0, i2)?;
        assert_approx_eq!(estimated, (5.0 + 0.5 * 3.0) / 1.5);

        let mut closest = knn(&data, KnnFlavor::Basic, 1);
        assert_approx_eq!(closest.estimate(&data, u0, i2)?, 5.0);

        Ok(())
    }

    #[test]
    fn large_k_doesnt_matter() -> Result<(), Error> {
        let data = toy()?;
        let n = data.n_users();

        for user in 0..data.n_users() {
            for item in 0..data.n_items() {
                let a = knn(&data, KnnFlavor::Basic, n).estimate(&data, user, item);
                let b = knn(&data, KnnFlavor::Basic, n + 25).estimate(&data, user, item);

                match (a, b) {
                    (Ok(a), Ok(b)) => assert_approx_eq!(a, b),
                    (Err(_), Err(_)) => {}
                    _ => panic!("k changed the outcome for ({}, {})", user, item),
                }
            }
        }

        Ok(())
    }

    #[test]
    fn with_means_centers_ratings() -> Result<(), Error> {
        let data = toy()?;
        let u0 = data.to_inner("u0", Kind::User)?;
        let i2 = data.to_inner("i2", Kind::Item)?;

        let mut algo = knn(&data, KnnFlavor::WithMeans, 40);
        let estimated = algo.estimate(&data, u0, i2)?;

        let mean_u0 = 3.0;
        let dev_u1 = 5.0 - 11.0 / 3.0;
        let dev_u2 = 3.0 - 7.0 / 3.0;
        assert_approx_eq!(estimated, mean_u0 + (dev_u1 + 0.5 * dev_u2) / 1.5);

        Ok(())
    }

    #[test]
    fn baseline_flavor_adds_residuals() -> Result<(), Error> {
        let data = toy()?;
        let u0 = data.to_inner("u0", Kind::User)?;
        let i2 = data.to_inner("i2", Kind::Item)?;

        let mut bu = vec![0.0; data.n_users()];
        bu[data.to_inner("u2", Kind::User)?] = -1.0;
        let baselines = Baselines::from_parts(3.0, bu, vec![0.0; data.n_items()]);

        let mut algo = knn(&data, KnnFlavor::Baseline(baselines), 40);
        let estimated = algo.estimate(&data, u0, i2)?;

        // residuals: u1 = 5 - 3 = 2, u2 = 3 - 2 = 1
        assert_approx_eq!(estimated, 3.0 + (2.0 + 0.5 * 1.0) / 1.5);

        Ok(())
    }

    #[test]
    fn no_neighbors_falls_back() -> Result<(), Error> {
        let data = toy()?;
        let u3 = data.to_inner("u3", Kind::User)?;
        let i0 = data.to_inner("i0", Kind::Item)?;

        // u3 shares nothing with the raters of i0
        let mut algo = knn(&data, KnnFlavor::Basic, 40);
        assert!(matches!(
            algo.estimate(&data, u3, i0),
            Err(ErrorKind::EmptyKNearestNeighbors)
        ));
        assert_approx_eq!(algo.fallback(&data, u3, i0), data.global_mean());

        let baselines = Baselines::from_parts(2.5, vec![0.5; 4], vec![0.0; 5]);
        let algo = knn(&data, KnnFlavor::Baseline(baselines), 40);
        assert_approx_eq!(algo.fallback(&data, u3, i0), 3.0);

        Ok(())
    }

    #[test]
    fn item_basis() -> Result<(), Error> {
        let data = toy()?;
        let u0 = data.to_inner("u0", Kind::User)?;
        let i2 = data.to_inner("i2", Kind::Item)?;

        let similarities = SimilarityMatrix::compute(&data, Measure::Cosine, Basis::Item, 1);
        let mut algo = Knn::new(KnnFlavor::Basic, Basis::Item, 40, similarities);

        // Every item rated by u0 is a candidate
        let (x0, y0) = Basis::Item.orient(u0, i2);
        let neighbors = algo.neighbors(&data, x0, y0);
        assert_eq!(neighbors.len(), 2);

        let estimated = algo.estimate(&data, u0, i2)?;
        assert!(estimated >= 2.0 && estimated <= 4.0);

        Ok(())
    }
}
