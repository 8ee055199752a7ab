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

//! Rating prediction algorithms and the machinery to evaluate them.
//!
//! Raw ratings become a [`TrainingData`](training_data::TrainingData), an
//! [`Algorithm`](algorithms::Algorithm) is trained on it and then asked for
//! the held out ratings, [`compute_stats`](stats::compute_stats) measures how
//! far it was.

pub mod algorithms;
pub mod baseline;
pub mod error;
pub mod evaluation;
pub mod folds;
pub mod grid_search;
pub mod neighbor;
pub mod options;
pub mod similarity;
pub mod stats;
pub mod training_data;
pub mod utils;

pub use algorithms::{Algorithm, Infos, Prediction};
pub use error::ErrorKind;
pub use evaluation::{cross_validate, cross_validate_with, evaluate_split, Evaluation, FoldResult};
pub use grid_search::GridSearch;
pub use options::{AlgorithmKind, BaselineMethod, Measure, Options};
pub use stats::{compute_stats, Accuracy, Stats};
pub use training_data::{Basis, Kind, TrainingData};
