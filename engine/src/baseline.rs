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
    options::{AlsOptions, BaselineOptions, SgdOptions},
    training_data::{Basis, TrainingData},
};
use std::time::Instant;

/// `rating ≈ global_mean + user_bias + item_bias`, fitted on one training set
#[derive(Debug, Clone, PartialEq)]
pub struct Baselines {
    global_mean: f64,
    user_biases: Vec<f64>,
    item_biases: Vec<f64>,
}

impl Baselines {
    pub fn compute(data: &TrainingData, options: &BaselineOptions) -> Self {
        let now = Instant::now();
        let (user_biases, item_biases) = match options {
            BaselineOptions::Als(als_options) => als(data, als_options),
            BaselineOptions::Sgd(sgd_options) => sgd(data, sgd_options),
        };

        log::debug!(
            "Fitted {} baselines ({} epochs) in {:?}",
            options.method().name(),
            options.n_epochs(),
            now.elapsed()
        );

        Self {
            global_mean: data.global_mean(),
            user_biases,
            item_biases,
        }
    }

    pub fn from_parts(global_mean: f64, user_biases: Vec<f64>, item_biases: Vec<f64>) -> Self {
        Self {
            global_mean,
            user_biases,
            item_biases,
        }
    }

    pub fn estimate(&self, user: usize, item: usize) -> f64 {
        self.global_mean + self.user_biases[user] + self.item_biases[item]
    }

    /// Same as `estimate` but taking `(x, y)` coordinates
    pub fn estimate_xy(&self, basis: Basis, x: usize, y: usize) -> f64 {
        let (user, item) = basis.user_item(x, y);
        self.estimate(user, item)
    }

    pub fn global_mean(&self) -> f64 {
        self.global_mean
    }

    pub fn user_biases(&self) -> &[f64] {
        &self.user_biases
    }

    pub fn item_biases(&self) -> &[f64] {
        &self.item_biases
    }
}

/// Alternating least squares, each epoch is a full item pass followed by a
/// full user pass. The regularization is added to the rating count.
pub fn als(data: &TrainingData, options: &AlsOptions) -> (Vec<f64>, Vec<f64>) {
    let global_mean = data.global_mean();
    let mut bu = vec![0.0; data.n_users()];
    let mut bi = vec![0.0; data.n_items()];

    for _ in 0..options.n_epochs {
        for (i, bias) in bi.iter_mut().enumerate() {
            let ratings = data.item_ratings(i);
            let dev: f64 = ratings
                .iter()
                .map(|&(u, r)| r - global_mean - bu[u])
                .sum();

            *bias = dev / (options.reg_i + ratings.len() as f64);
        }

        for (u, bias) in bu.iter_mut().enumerate() {
            let ratings = data.user_ratings(u);
            let dev: f64 = ratings
                .iter()
                .map(|&(i, r)| r - global_mean - bi[i])
                .sum();

            *bias = dev / (options.reg_u + ratings.len() as f64);
        }
    }

    (bu, bi)
}

/// Stochastic gradient descent over the ratings in their natural order
pub fn sgd(data: &TrainingData, options: &SgdOptions) -> (Vec<f64>, Vec<f64>) {
    let global_mean = data.global_mean();
    let lr = options.learning_rate;
    let reg = options.regularization;

    let mut bu = vec![0.0; data.n_users()];
    let mut bi = vec![0.0; data.n_items()];

    for _ in 0..options.n_epochs {
        for &(u, i, r) in data.all_ratings() {
            let err = r - (global_mean + bu[u] + bi[i]);
            bu[u] += lr * (err - reg * bu[u]);
            bi[i] += lr * (err - reg * bi[i]);
        }
    }

    (bu, bi)
}
