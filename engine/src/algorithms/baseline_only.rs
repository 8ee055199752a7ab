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
use crate::{baseline::Baselines, error::ErrorKind, training_data::TrainingData};

pub struct BaselineOnly {
    baselines: Baselines,
}

impl BaselineOnly {
    pub fn new(baselines: Baselines) -> Self {
        Self { baselines }
    }
}

impl Estimator for BaselineOnly {
    fn estimate(&mut self, _data: &TrainingData, user: usize, item: usize) -> Result<f64, ErrorKind> {
        Ok(self.baselines.estimate(user, item))
    }
}
