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
    algorithms::{Algorithm, Infos, Prediction},
    folds::KFolds,
    options::{AlgorithmKind, Options},
    stats::{compute_stats, Accuracy, Stats},
    training_data::{Kind, TrainingData},
};
use anyhow::Error;
use controller::{RatingScale, RawRating, Reader};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Instant;

/// What one fold left behind once tested
#[derive(Debug, Clone)]
pub struct FoldResult {
    pub fold: usize,
    pub stats: Stats,
    pub infos: Infos,
    pub preds: Vec<Prediction>,
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub algorithm: AlgorithmKind,
    pub folds: Vec<FoldResult>,
}

impl Evaluation {
    /// Mean of `measure` across folds, missing if any fold lacks it
    pub fn mean(&self, measure: Accuracy) -> Option<f64> {
        let values = self
            .folds
            .iter()
            .map(|f| f.stats.get(measure))
            .collect::<Option<Vec<_>>>()?;

        if values.is_empty() {
            return None;
        }

        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn mean_rmse(&self) -> f64 {
        self.folds.iter().map(|f| f.stats.rmse).sum::<f64>() / self.folds.len() as f64
    }

    pub fn mean_mae(&self) -> f64 {
        self.folds.iter().map(|f| f.stats.mae).sum::<f64>() / self.folds.len() as f64
    }

    pub fn mean_fcp(&self) -> Option<f64> {
        self.mean(Accuracy::Fcp)
    }
}

/// The explicitly owned random source of a run
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .progress_chars("=> "),
    );
    bar
}

/// Trains on `trainset` from scratch and predicts every rating of `testset`.
///
/// Test ratings whose user or item wasn't part of the training set are
/// skipped and counted, they never reach the algorithm.
pub fn evaluate_fold(
    options: &Options,
    fold: usize,
    trainset: &[RawRating],
    testset: &[RawRating],
    scale: RatingScale,
    rng: &mut StdRng,
    verbose: bool,
) -> Result<FoldResult, Error> {
    let data = TrainingData::build(trainset, scale)?;
    let mut algo = Algorithm::train(options, &data, rng)?;

    let bar = progress_bar(testset.len(), verbose);
    bar.set_message(&format!("Fold {}", fold + 1));

    let now = Instant::now();
    let mut skipped: usize = 0;
    for raw in testset {
        let ids = data
            .to_inner(&raw.user, Kind::User)
            .and_then(|user| Ok((user, data.to_inner(&raw.item, Kind::Item)?)));

        match ids {
            Ok((user, item)) => {
                algo.predict(user, item, raw.rating, verbose);
            }
            Err(e) => {
                skipped += 1;
                if verbose {
                    log::info!("Skipping ({}, {}): {}", raw.user, raw.item, e);
                } else {
                    log::debug!("Skipping ({}, {}): {}", raw.user, raw.item, e);
                }
            }
        }

        bar.inc(1);
    }
    bar.finish_and_clear();

    let testing_time = now.elapsed().as_secs_f64();
    let impossible = algo.preds().iter().filter(|p| p.impossible).count();
    let predictions = algo.preds().len();

    algo.set_info("testingTime", testing_time);
    algo.set_info("predictions", predictions);
    algo.set_info("impossible", impossible);
    algo.set_info("skipped", skipped);

    let (preds, infos) = algo.into_results();
    let stats = compute_stats(&preds)?;

    log::info!(
        "Fold {}: RMSE {:1.4}, {} predictions ({} impossible, {} skipped)",
        fold + 1,
        stats.rmse,
        predictions,
        impossible,
        skipped
    );

    Ok(FoldResult {
        fold,
        stats,
        infos,
        preds,
    })
}

/// k-fold cross-validation of the algorithm described by `options`,
/// `on_fold` sees every fold as soon as it's tested
pub fn cross_validate_with<F>(
    options: &Options,
    reader: &Reader,
    verbose: bool,
    mut on_fold: F,
) -> Result<Evaluation, Error>
where
    F: FnMut(&FoldResult) -> Result<(), Error>,
{
    let mut rng = make_rng(options.seed);
    let folds = KFolds::new(reader.ratings.clone(), options.folds, &mut rng)?;

    let mut results = Vec::with_capacity(options.folds);
    for fold in folds {
        let result = evaluate_fold(
            options,
            fold.index,
            &fold.trainset,
            &fold.testset,
            reader.scale,
            &mut rng,
            verbose,
        )?;

        on_fold(&result)?;
        results.push(result);
    }

    Ok(Evaluation {
        algorithm: options.algorithm,
        folds: results,
    })
}

pub fn cross_validate(options: &Options, reader: &Reader, verbose: bool) -> Result<Evaluation, Error> {
    cross_validate_with(options, reader, verbose, |_| Ok(()))
}

/// A single evaluation over an explicit train/test split
pub fn evaluate_split(
    options: &Options,
    train: &Reader,
    testset: &[RawRating],
    verbose: bool,
) -> Result<Evaluation, Error> {
    let mut rng = make_rng(options.seed);
    let result = evaluate_fold(
        options,
        0,
        &train.ratings,
        testset,
        train.scale,
        &mut rng,
        verbose,
    )?;

    Ok(Evaluation {
        algorithm: options.algorithm,
        folds: vec![result],
    })
}
