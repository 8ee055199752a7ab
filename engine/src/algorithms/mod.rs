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

pub mod analogy;
pub mod baseline_only;
pub mod clone;
pub mod knns;
pub mod random;

use crate::{
    baseline::Baselines,
    error::ErrorKind,
    options::{AlgorithmKind, Measure, Options},
    similarity::SimilarityMatrix,
    training_data::{Kind, TrainingData},
};
use analogy::{Analogy, AnalogyRule};
use baseline_only::BaselineOnly;
use clone::{CloneBruteforce, CloneKnnMeanDiff, CloneMeanDiff};
use controller::Value;
use knns::{Knn, KnnFlavor};
use rand::{rngs::StdRng, Rng, SeedableRng};
use random::RandomPredictor;
use std::{collections::BTreeMap, time::Instant};

pub type Infos = BTreeMap<String, Value>;

/// One tested `(user, item)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub user: String,
    pub item: String,
    pub actual: f64,
    pub estimated: f64,
    /// The estimator had nothing to work with and fell back
    pub impossible: bool,
}

/// The part every prediction algorithm implements, everything is in inner ids.
///
/// An `Err` means the estimator can't say anything about this pair, the
/// caller then uses `fallback` and flags the prediction.
pub trait Estimator {
    fn estimate(&mut self, data: &TrainingData, user: usize, item: usize) -> Result<f64, ErrorKind>;

    fn fallback(&self, data: &TrainingData, _user: usize, _item: usize) -> f64 {
        data.global_mean()
    }
}

/// A trained algorithm, tied to the training set it was fitted on.
pub struct Algorithm<'a> {
    kind: AlgorithmKind,
    data: &'a TrainingData,
    estimator: Box<dyn Estimator>,
    preds: Vec<Prediction>,
    infos: Infos,
}

fn build_estimator(
    options: &Options,
    data: &TrainingData,
    rng: &mut StdRng,
) -> Result<Box<dyn Estimator>, ErrorKind> {
    let similarities = |measure: Measure| {
        SimilarityMatrix::compute(data, measure, options.basis, options.min_support)
    };

    let estimator: Box<dyn Estimator> = match options.algorithm {
        AlgorithmKind::Random => Box::new(RandomPredictor::new(
            data,
            StdRng::seed_from_u64(rng.gen()),
        )?),

        AlgorithmKind::BaselineOnly => {
            Box::new(BaselineOnly::new(Baselines::compute(data, &options.baseline)))
        }

        AlgorithmKind::KnnBasic => Box::new(Knn::new(
            KnnFlavor::Basic,
            options.basis,
            options.k,
            similarities(options.measure),
        )),

        AlgorithmKind::KnnWithMeans => Box::new(Knn::new(
            KnnFlavor::WithMeans,
            options.basis,
            options.k,
            similarities(options.measure),
        )),

        AlgorithmKind::KnnBaseline => Box::new(Knn::new(
            KnnFlavor::Baseline(Baselines::compute(data, &options.baseline)),
            options.basis,
            options.k,
            similarities(options.measure),
        )),

        AlgorithmKind::Parall => Box::new(Analogy::new(
            AnalogyRule::Parall,
            options.basis,
            options.k,
            options.analogy,
            StdRng::seed_from_u64(rng.gen()),
        )),

        AlgorithmKind::Pattern => Box::new(Analogy::new(
            AnalogyRule::Pattern,
            options.basis,
            options.k,
            options.analogy,
            StdRng::seed_from_u64(rng.gen()),
        )),

        AlgorithmKind::CloneBruteforce => {
            Box::new(CloneBruteforce::new(options.basis, options.min_support))
        }

        AlgorithmKind::CloneMeanDiff => {
            Box::new(CloneMeanDiff::new(options.basis, options.min_support))
        }

        AlgorithmKind::CloneKnnMeanDiff => Box::new(CloneKnnMeanDiff::new(
            options.basis,
            options.k,
            options.min_support,
            similarities(options.measure),
        )),
    };

    Ok(estimator)
}

impl<'a> Algorithm<'a> {
    /// Fits the algorithm described by `options`, `rng` seeds the algorithms
    /// that draw random numbers.
    pub fn train(
        options: &Options,
        data: &'a TrainingData,
        rng: &mut StdRng,
    ) -> Result<Self, ErrorKind> {
        let now = Instant::now();
        let estimator = build_estimator(options, data, rng)?;
        let training_time = now.elapsed().as_secs_f64();

        let kind = options.algorithm;
        let mut infos = Infos::new();
        infos.insert("name".into(), kind.name().into());
        infos.insert("basis".into(), options.basis.name().into());
        infos.insert("trainingTime".into(), training_time.into());

        if kind.uses_similarity() {
            infos.insert("sim".into(), options.measure.name().into());
        }

        if kind.uses_min_support() {
            infos.insert("minSupport".into(), options.min_support.into());
        }

        if kind.uses_k() {
            infos.insert("k".into(), options.k.into());
        }

        if kind.uses_baselines() {
            infos.insert("method".into(), options.baseline.method().name().into());
        }

        log::debug!("Trained {} in {:.4}s", kind, training_time);

        Ok(Self {
            kind,
            data,
            estimator,
            preds: Vec::new(),
            infos,
        })
    }

    /// Estimates the rating `user` would give to `item`, clamped to the
    /// dataset scale, and records it.
    pub fn predict(&mut self, user: usize, item: usize, actual: f64, verbose: bool) -> f64 {
        let (estimated, impossible) = match self.estimator.estimate(self.data, user, item) {
            Ok(estimated) => (estimated, false),
            Err(e) => {
                log::trace!("Falling back for ({}, {}): {}", user, item, e);
                (self.estimator.fallback(self.data, user, item), true)
            }
        };

        let estimated = self.data.scale().clamp(estimated);
        let prediction = Prediction {
            user: self.data.to_raw(user, Kind::User).unwrap_or_default().to_owned(),
            item: self.data.to_raw(item, Kind::Item).unwrap_or_default().to_owned(),
            actual,
            estimated,
            impossible,
        };

        if verbose {
            log::info!(
                "user: {:<10} item: {:<10} r_ui = {:1.2}   est = {:1.2}{}",
                prediction.user,
                prediction.item,
                actual,
                estimated,
                if impossible { "   (impossible)" } else { "" }
            );
        }

        self.preds.push(prediction);
        estimated
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.kind
    }

    pub fn data(&self) -> &TrainingData {
        self.data
    }

    pub fn preds(&self) -> &[Prediction] {
        &self.preds
    }

    pub fn infos(&self) -> &Infos {
        &self.infos
    }

    pub fn set_info(&mut self, key: &str, value: impl Into<Value>) {
        self.infos.insert(key.into(), value.into());
    }

    /// Hands over what was recorded while testing
    pub fn into_results(self) -> (Vec<Prediction>, Infos) {
        (self.preds, self.infos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BaselineOptions;
    use anyhow::Error;
    use assert_approx_eq::*;
    use controller::{RatingScale, RawRating};

    fn toy() -> Result<TrainingData, ErrorKind> {
        let ratings = vec![
            RawRating::new("u1", "i1", 5.0),
            RawRating::new("u2", "i1", 3.0),
            RawRating::new("u1", "i2", 4.0),
        ];

        TrainingData::build(&ratings, RatingScale::new(1.0, 5.0))
    }

    struct Fixed(Option<f64>);

    impl Estimator for Fixed {
        fn estimate(&mut self, _: &TrainingData, _: usize, _: usize) -> Result<f64, ErrorKind> {
            self.0.ok_or(ErrorKind::EmptyKNearestNeighbors)
        }
    }

    fn with_estimator(data: &TrainingData, estimator: Box<dyn Estimator>) -> Algorithm<'_> {
        Algorithm {
            kind: AlgorithmKind::Random,
            data,
            estimator,
            preds: Vec::new(),
            infos: Infos::new(),
        }
    }

    #[test]
    fn predictions_are_clamped_and_recorded() -> Result<(), Error> {
        let data = toy()?;

        let mut algo = with_estimator(&data, Box::new(Fixed(Some(7.5))));
        assert_approx_eq!(algo.predict(1, 1, 3.0, false), 5.0);

        let mut algo = with_estimator(&data, Box::new(Fixed(Some(-2.0))));
        assert_approx_eq!(algo.predict(1, 1, 3.0, true), 1.0);

        let pred = &algo.preds()[0];
        assert_eq!(pred.user, "u2");
        assert_eq!(pred.item, "i2");
        assert_approx_eq!(pred.actual, 3.0);
        assert!(!pred.impossible);

        Ok(())
    }

    #[test]
    fn failed_estimates_fall_back() -> Result<(), Error> {
        let data = toy()?;
        let mut algo = with_estimator(&data, Box::new(Fixed(None)));

        assert_approx_eq!(algo.predict(1, 1, 3.0, false), 4.0);
        assert!(algo.preds()[0].impossible);

        Ok(())
    }

    #[test]
    fn train_fills_infos() -> Result<(), Error> {
        let data = toy()?;
        let mut rng = StdRng::seed_from_u64(0);

        let options = Options {
            algorithm: AlgorithmKind::KnnBaseline,
            ..Options::default()
        };
        let algo = Algorithm::train(&options, &data, &mut rng)?;
        let infos = algo.infos();

        assert_eq!(infos["name"].as_string()?, "KNNBaseline");
        assert_eq!(infos["basis"].as_string()?, "user");
        assert_eq!(infos["sim"].as_string()?, "MSD");
        assert_eq!(infos["k"].as_i64()?, 40);
        assert_eq!(infos["method"].as_string()?, "als");
        assert!(infos["trainingTime"].as_f64()? >= 0.0);

        let options = Options {
            algorithm: AlgorithmKind::Random,
            ..Options::default()
        };
        let algo = Algorithm::train(&options, &data, &mut rng)?;
        assert!(!algo.infos().contains_key("sim"));
        assert!(!algo.infos().contains_key("k"));

        Ok(())
    }

    #[test]
    fn every_algorithm_trains_and_predicts() -> Result<(), Error> {
        let data = toy()?;
        let mut rng = StdRng::seed_from_u64(42);

        for kind in AlgorithmKind::ALL.iter() {
            let options = Options {
                algorithm: *kind,
                ..Options::default()
            };

            let mut algo = Algorithm::train(&options, &data, &mut rng)?;
            let estimated = algo.predict(1, 1, 4.0, false);

            assert!(estimated >= 1.0 && estimated <= 5.0, "{} out of scale", kind);
            assert_eq!(algo.kind(), *kind);
            assert_eq!(algo.preds().len(), 1);
        }

        Ok(())
    }

    #[test]
    fn baseline_only_end_to_end() -> Result<(), Error> {
        let data = toy()?;
        let u2 = data.to_inner("u2", Kind::User)?;
        let i2 = data.to_inner("i2", Kind::Item)?;

        let baselines = Baselines::from_parts(4.0, vec![0.0, -1.0], vec![0.0, 0.0]);
        let mut algo = with_estimator(&data, Box::new(BaselineOnly::new(baselines)));
        assert_approx_eq!(algo.predict(u2, i2, 3.0, false), 3.0);

        // One unregularized als epoch fits exactly those biases
        let mut config = config::Config::default();
        config.algorithm.name = "BaselineOnly".into();
        config.baseline.als.n_epochs = 1;
        config.baseline.als.reg_u = 0.0;
        config.baseline.als.reg_i = 0.0;

        let options = Options::from_config(&config)?;
        assert!(matches!(options.baseline, BaselineOptions::Als(_)));

        let mut rng = StdRng::seed_from_u64(0);
        let mut algo = Algorithm::train(&options, &data, &mut rng)?;
        assert_approx_eq!(algo.predict(u2, i2, 3.0, false), 3.0);

        Ok(())
    }
}
