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
use crate::{error::ErrorKind, training_data::TrainingData};
use rand::{distributions::Distribution, rngs::StdRng};
use rand_distr::Normal;

/// Draws ratings from a normal distribution fitted to the training ratings
pub struct RandomPredictor {
    normal: Normal<f64>,
    rng: StdRng,
}

impl RandomPredictor {
    pub fn new(data: &TrainingData, rng: StdRng) -> Result<Self, ErrorKind> {
        let normal = Normal::new(data.global_mean(), data.rating_std())
            .map_err(|e| ErrorKind::Distribution(format!("{:?}", e)))?;

        Ok(Self { normal, rng })
    }
}

impl Estimator for RandomPredictor {
    fn estimate(&mut self, _data: &TrainingData, _user: usize, _item: usize) -> Result<f64, ErrorKind> {
        Ok(self.normal.sample(&mut self.rng))
    }
}
