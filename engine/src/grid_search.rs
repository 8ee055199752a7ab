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
    evaluation::cross_validate,
    options::Options,
    stats::Accuracy,
};
use anyhow::Error;
use config::{Config, GridConfig};
use controller::{Reader, Value};
use std::{cmp::Ordering, collections::BTreeMap};

pub type Params = BTreeMap<String, Value>;

type Partial = (Config, Params);

/// Values tried for every parameter, never empty once built
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGrid {
    pub algorithm: Vec<String>,
    pub k: Vec<usize>,
    pub sim: Vec<String>,
    pub min_support: Vec<usize>,
    pub item_based: Vec<bool>,
    pub method: Vec<String>,
    /// `None` keeps the regularization terms of the base configuration
    pub reg: Vec<Option<f64>>,
}

fn or_base<T: Clone>(values: &[T], base: &T) -> Vec<T> {
    if values.is_empty() {
        vec![base.clone()]
    } else {
        values.to_vec()
    }
}

/// Every partial combination followed by every value, in that order
fn expand<T, F>(partials: Vec<Partial>, values: &[T], apply: F) -> Vec<Partial>
where
    F: Fn(&mut Config, &mut Params, &T),
{
    let mut expanded = Vec::with_capacity(partials.len() * values.len());
    for (config, params) in &partials {
        for value in values {
            let mut config = config.clone();
            let mut params = params.clone();
            apply(&mut config, &mut params, value);
            expanded.push((config, params));
        }
    }

    expanded
}

impl ParamGrid {
    /// Empty lists in `grid` keep the value `base` already has
    pub fn new(grid: &GridConfig, base: &Config) -> Self {
        let reg = if grid.reg.is_empty() {
            vec![None]
        } else {
            grid.reg.iter().copied().map(Some).collect()
        };

        Self {
            algorithm: or_base(&grid.algorithm, &base.algorithm.name),
            k: or_base(&grid.k, &base.algorithm.k),
            sim: or_base(&grid.sim, &base.algorithm.sim),
            min_support: or_base(&grid.min_support, &base.algorithm.min_support),
            item_based: or_base(&grid.item_based, &base.algorithm.item_based),
            method: or_base(&grid.method, &base.baseline.method),
            reg,
        }
    }

    pub fn len(&self) -> usize {
        self.algorithm.len()
            * self.k.len()
            * self.sim.len()
            * self.min_support.len()
            * self.item_based.len()
            * self.method.len()
            * self.reg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination of the grid applied over `base`, validated
    pub fn candidates(&self, base: &Config) -> Result<Vec<(Params, Options)>, ErrorKind> {
        let mut partials = vec![(base.clone(), Params::new())];

        partials = expand(partials, &self.algorithm, |config, params, name| {
            config.algorithm.name = name.clone();
            params.insert("algorithm".into(), name.as_str().into());
        });
        partials = expand(partials, &self.k, |config, params, k| {
            config.algorithm.k = *k;
            params.insert("k".into(), (*k).into());
        });
        partials = expand(partials, &self.sim, |config, params, sim| {
            config.algorithm.sim = sim.clone();
            params.insert("sim".into(), sim.as_str().into());
        });
        partials = expand(partials, &self.min_support, |config, params, min_support| {
            config.algorithm.min_support = *min_support;
            params.insert("minSupport".into(), (*min_support).into());
        });
        partials = expand(partials, &self.item_based, |config, params, item_based| {
            config.algorithm.item_based = *item_based;
            params.insert("itemBased".into(), (*item_based).into());
        });
        partials = expand(partials, &self.method, |config, params, method| {
            config.baseline.method = method.clone();
            params.insert("method".into(), method.as_str().into());
        });
        partials = expand(partials, &self.reg, |config, params, reg| {
            if let Some(reg) = *reg {
                config.baseline.als.reg_u = reg;
                config.baseline.als.reg_i = reg;
                config.baseline.sgd.regularization = reg;
                params.insert("reg".into(), reg.into());
            }
        });

        partials
            .into_iter()
            .map(|(config, params)| -> Result<_, ErrorKind> {
                Ok((params, Options::from_config(&config)?))
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct GridResult {
    pub params: Params,
    pub options: Options,
    pub mean_rmse: f64,
    pub mean_mae: f64,
    pub mean_fcp: Option<f64>,
}

impl GridResult {
    pub fn get(&self, measure: Accuracy) -> Option<f64> {
        match measure {
            Accuracy::Rmse => Some(self.mean_rmse),
            Accuracy::Mae => Some(self.mean_mae),
            Accuracy::Fcp => self.mean_fcp,
        }
    }
}

/// A validated grid search, ready to run
#[derive(Debug, Clone)]
pub struct GridPlan {
    pub measure: Accuracy,
    pub seed: u64,
    pub candidates: Vec<(Params, Options)>,
}

/// Cross-validates every combination of a parameter grid.
///
/// All candidates share the same seed, so they are tested on the very same
/// folds.
#[derive(Debug, Clone)]
pub struct GridSearch {
    pub measure: Accuracy,
    pub results: Vec<GridResult>,
}

impl GridSearch {
    /// Parses the measure and builds every candidate, nothing is evaluated
    pub fn plan(base: &Config, grid: &GridConfig) -> Result<GridPlan, ErrorKind> {
        let measure: Accuracy = grid.measure.parse()?;
        let candidates = ParamGrid::new(grid, base).candidates(base)?;
        let seed = base.evaluation.seed.unwrap_or_else(rand::random);

        Ok(GridPlan {
            measure,
            seed,
            candidates,
        })
    }

    pub fn run(plan: GridPlan, reader: &Reader, verbose: bool) -> Result<Self, Error> {
        log::info!(
            "Grid search over {} candidates (seed {}, by {})",
            plan.candidates.len(),
            plan.seed,
            plan.measure.name()
        );

        let mut results = Vec::with_capacity(plan.candidates.len());
        for (params, mut options) in plan.candidates {
            options.seed = Some(plan.seed);

            let evaluation = cross_validate(&options, reader, verbose)?;
            let described: Vec<_> = params.iter().map(|(key, value)| format!("{}={}", key, value)).collect();
            log::info!("{}: RMSE {:1.4}", described.join(" "), evaluation.mean_rmse());

            results.push(GridResult {
                params,
                options,
                mean_rmse: evaluation.mean_rmse(),
                mean_mae: evaluation.mean_mae(),
                mean_fcp: evaluation.mean_fcp(),
            });
        }

        Ok(Self {
            measure: plan.measure,
            results,
        })
    }

    /// The best candidate by the measure the search was planned with
    pub fn best(&self) -> Result<&GridResult, ErrorKind> {
        self.best_by(self.measure)
    }

    /// Lowest mean error, or highest mean FCP. Candidates missing the measure
    /// are left out.
    pub fn best_by(&self, measure: Accuracy) -> Result<&GridResult, ErrorKind> {
        self.results
            .iter()
            .filter_map(|result| result.get(measure).map(|score| (result, score)))
            .min_by(|(_, a), (_, b)| {
                let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
                if measure.higher_is_better() {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .map(|(result, _)| result)
            .ok_or(ErrorKind::EmptyPredictions)
    }
}
