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

use crate::{algorithms::Prediction, error::ErrorKind};
use controller::Value;
use std::{
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

/// Error statistics of a set of predictions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub rmse: f64,
    pub mae: f64,
    /// Mean of `estimated - actual`
    pub bias: f64,
    /// Missing when no user has two predictions with different actual ratings
    pub fcp: Option<f64>,
    pub count: usize,
}

impl Stats {
    pub fn get(&self, measure: Accuracy) -> Option<f64> {
        match measure {
            Accuracy::Rmse => Some(self.rmse),
            Accuracy::Mae => Some(self.mae),
            Accuracy::Fcp => self.fcp,
        }
    }

    pub fn to_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("RMSE".into(), self.rmse.into());
        map.insert("MAE".into(), self.mae.into());
        map.insert("bias".into(), self.bias.into());
        map.insert("count".into(), self.count.into());
        if let Some(fcp) = self.fcp {
            map.insert("FCP".into(), fcp.into());
        }
        map
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Accuracy {
    Rmse,
    Mae,
    Fcp,
}

impl Accuracy {
    pub fn name(self) -> &'static str {
        match self {
            Accuracy::Rmse => "RMSE",
            Accuracy::Mae => "MAE",
            Accuracy::Fcp => "FCP",
        }
    }

    /// Errors are minimized, FCP is maximized
    pub fn higher_is_better(self) -> bool {
        self == Accuracy::Fcp
    }
}

impl FromStr for Accuracy {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rmse" => Ok(Accuracy::Rmse),
            "mae" => Ok(Accuracy::Mae),
            "fcp" => Ok(Accuracy::Fcp),
            _ => Err(ErrorKind::UnknownAccuracy(s.into())),
        }
    }
}

/// Fraction of concordant pairs.
///
/// For every user, every pair of predictions whose actual ratings differ is
/// concordant when the estimates are ordered the same way, discordant
/// otherwise (ties in the estimates included). Counts are summed over users.
pub fn fcp(preds: &[Prediction]) -> Result<f64, ErrorKind> {
    if preds.is_empty() {
        return Err(ErrorKind::EmptyPredictions);
    }

    let mut by_user: HashMap<&str, Vec<(f64, f64)>> = HashMap::new();
    for pred in preds {
        by_user
            .entry(pred.user.as_str())
            .or_default()
            .push((pred.actual, pred.estimated));
    }

    let mut concordant = 0usize;
    let mut discordant = 0usize;
    for user_preds in by_user.values() {
        for &(actual_i, est_i) in user_preds {
            for &(actual_j, est_j) in user_preds {
                if actual_i > actual_j {
                    if est_i > est_j {
                        concordant += 1;
                    } else {
                        discordant += 1;
                    }
                }
            }
        }
    }

    if concordant + discordant == 0 {
        return Err(ErrorKind::IndeterminateForm);
    }

    Ok(concordant as f64 / (concordant + discordant) as f64)
}

pub fn compute_stats(preds: &[Prediction]) -> Result<Stats, ErrorKind> {
    if preds.is_empty() {
        return Err(ErrorKind::EmptyPredictions);
    }

    let mut sq_err = 0.0;
    let mut abs_err = 0.0;
    let mut bias = 0.0;
    for pred in preds {
        let err = pred.estimated - pred.actual;
        sq_err += err.powi(2);
        abs_err += err.abs();
        bias += err;
    }

    let n = preds.len() as f64;
    Ok(Stats {
        rmse: (sq_err / n).sqrt(),
        mae: abs_err / n,
        bias: bias / n,
        fcp: fcp(preds).ok(),
        count: preds.len(),
    })
}
