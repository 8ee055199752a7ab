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

use crate::{error::ErrorKind, training_data::Basis};
use config::Config;
use std::{
    fmt::{self, Display},
    str::FromStr,
};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum AlgorithmKind {
    Random,
    BaselineOnly,
    KnnBasic,
    KnnWithMeans,
    KnnBaseline,
    Parall,
    Pattern,
    CloneBruteforce,
    CloneMeanDiff,
    CloneKnnMeanDiff,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 10] = [
        AlgorithmKind::Random,
        AlgorithmKind::BaselineOnly,
        AlgorithmKind::KnnBasic,
        AlgorithmKind::KnnWithMeans,
        AlgorithmKind::KnnBaseline,
        AlgorithmKind::Parall,
        AlgorithmKind::Pattern,
        AlgorithmKind::CloneBruteforce,
        AlgorithmKind::CloneMeanDiff,
        AlgorithmKind::CloneKnnMeanDiff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Random => "Random",
            AlgorithmKind::BaselineOnly => "BaselineOnly",
            AlgorithmKind::KnnBasic => "KNNBasic",
            AlgorithmKind::KnnWithMeans => "KNNWithMeans",
            AlgorithmKind::KnnBaseline => "KNNBaseline",
            AlgorithmKind::Parall => "Parall",
            AlgorithmKind::Pattern => "Pattern",
            AlgorithmKind::CloneBruteforce => "CloneBruteforce",
            AlgorithmKind::CloneMeanDiff => "CloneMeanDiff",
            AlgorithmKind::CloneKnnMeanDiff => "CloneKNNMeanDiff",
        }
    }

    pub fn uses_similarity(self) -> bool {
        match self {
            AlgorithmKind::KnnBasic
            | AlgorithmKind::KnnWithMeans
            | AlgorithmKind::KnnBaseline
            | AlgorithmKind::CloneKnnMeanDiff => true,

            AlgorithmKind::Random
            | AlgorithmKind::BaselineOnly
            | AlgorithmKind::Parall
            | AlgorithmKind::Pattern
            | AlgorithmKind::CloneBruteforce
            | AlgorithmKind::CloneMeanDiff => false,
        }
    }

    pub fn uses_baselines(self) -> bool {
        match self {
            AlgorithmKind::BaselineOnly | AlgorithmKind::KnnBaseline => true,
            _ => false,
        }
    }

    pub fn uses_k(self) -> bool {
        match self {
            AlgorithmKind::Random
            | AlgorithmKind::BaselineOnly
            | AlgorithmKind::Pattern
            | AlgorithmKind::CloneBruteforce
            | AlgorithmKind::CloneMeanDiff => false,
            _ => true,
        }
    }

    pub fn uses_min_support(self) -> bool {
        match self {
            AlgorithmKind::CloneBruteforce | AlgorithmKind::CloneMeanDiff => true,
            _ => self.uses_similarity(),
        }
    }
}

impl Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmKind::ALL
            .iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ErrorKind::UnknownAlgorithm(s.into()))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Measure {
    Cosine,
    Pearson,
    Msd,
    MsdClone,
}

impl Measure {
    pub fn name(self) -> &'static str {
        match self {
            Measure::Cosine => "cos",
            Measure::Pearson => "pearson",
            Measure::Msd => "MSD",
            Measure::MsdClone => "MSDClone",
        }
    }
}

impl Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Measure {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cos" | "cosine" => Ok(Measure::Cosine),
            "pearson" => Ok(Measure::Pearson),
            "msd" => Ok(Measure::Msd),
            "msdclone" => Ok(Measure::MsdClone),
            _ => Err(ErrorKind::UnknownMeasure(s.into())),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BaselineMethod {
    Als,
    Sgd,
}

impl BaselineMethod {
    pub fn name(self) -> &'static str {
        match self {
            BaselineMethod::Als => "als",
            BaselineMethod::Sgd => "sgd",
        }
    }
}

impl FromStr for BaselineMethod {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "als" => Ok(BaselineMethod::Als),
            "sgd" => Ok(BaselineMethod::Sgd),
            _ => Err(ErrorKind::UnknownMethod(s.into())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlsOptions {
    pub n_epochs: usize,
    pub reg_u: f64,
    pub reg_i: f64,
}

impl Default for AlsOptions {
    fn default() -> Self {
        Self {
            n_epochs: 10,
            reg_u: 15.0,
            reg_i: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SgdOptions {
    pub n_epochs: usize,
    pub learning_rate: f64,
    pub regularization: f64,
}

impl Default for SgdOptions {
    fn default() -> Self {
        Self {
            n_epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
        }
    }
}

/// How the user and item biases are fitted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaselineOptions {
    Als(AlsOptions),
    Sgd(SgdOptions),
}

impl BaselineOptions {
    pub fn method(&self) -> BaselineMethod {
        match self {
            BaselineOptions::Als(_) => BaselineMethod::Als,
            BaselineOptions::Sgd(_) => BaselineMethod::Sgd,
        }
    }

    pub fn n_epochs(&self) -> usize {
        match self {
            BaselineOptions::Als(als) => als.n_epochs,
            BaselineOptions::Sgd(sgd) => sgd.n_epochs,
        }
    }
}

impl Default for BaselineOptions {
    fn default() -> Self {
        BaselineOptions::Als(AlsOptions::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogyOptions {
    /// Upper bound of candidate triples looked at per prediction
    pub n_samples: usize,
    /// Minimum co-rated entries shared by a triple and the target
    pub min_common: usize,
}

impl Default for AnalogyOptions {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            min_common: 3,
        }
    }
}

/// Everything needed to train and evaluate one algorithm, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub algorithm: AlgorithmKind,
    pub k: usize,
    pub measure: Measure,
    pub min_support: usize,
    pub basis: Basis,
    pub baseline: BaselineOptions,
    pub analogy: AnalogyOptions,
    pub folds: usize,
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::KnnBaseline,
            k: 40,
            measure: Measure::Msd,
            min_support: 1,
            basis: Basis::User,
            baseline: BaselineOptions::default(),
            analogy: AnalogyOptions::default(),
            folds: 5,
            seed: None,
        }
    }
}

impl Options {
    pub fn from_config(config: &Config) -> Result<Self, ErrorKind> {
        let method: BaselineMethod = config.baseline.method.parse()?;
        let baseline = match method {
            BaselineMethod::Als => BaselineOptions::Als(AlsOptions {
                n_epochs: config.baseline.als.n_epochs,
                reg_u: config.baseline.als.reg_u,
                reg_i: config.baseline.als.reg_i,
            }),
            BaselineMethod::Sgd => BaselineOptions::Sgd(SgdOptions {
                n_epochs: config.baseline.sgd.n_epochs,
                learning_rate: config.baseline.sgd.learning_rate,
                regularization: config.baseline.sgd.regularization,
            }),
        };

        let options = Self {
            algorithm: config.algorithm.name.parse()?,
            k: config.algorithm.k,
            measure: config.algorithm.sim.parse()?,
            min_support: config.algorithm.min_support,
            basis: Basis::from_item_based(config.algorithm.item_based),
            baseline,
            analogy: AnalogyOptions {
                n_samples: config.analogy.n_samples,
                min_common: config.analogy.min_common,
            },
            folds: config.evaluation.folds,
            seed: config.evaluation.seed,
        };

        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ErrorKind> {
        if self.k == 0 {
            return Err(ErrorKind::invalid("k", "must be a positive integer"));
        }

        if self.folds < 2 {
            return Err(ErrorKind::invalid("cv", "at least 2 folds are needed"));
        }

        if self.analogy.n_samples == 0 {
            return Err(ErrorKind::invalid("n_samples", "must be a positive integer"));
        }

        match self.baseline {
            BaselineOptions::Als(als) => {
                if als.reg_u < 0.0 || als.reg_i < 0.0 {
                    return Err(ErrorKind::invalid("reg", "can't be negative"));
                }
            }
            BaselineOptions::Sgd(sgd) => {
                if sgd.learning_rate <= 0.0 {
                    return Err(ErrorKind::invalid("learning_rate", "must be positive"));
                }
                if sgd.regularization < 0.0 {
                    return Err(ErrorKind::invalid("regularization", "can't be negative"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;

    #[test]
    fn names_are_case_insensitive() -> Result<(), Error> {
        assert_eq!("knnbaseline".parse::<AlgorithmKind>()?, AlgorithmKind::KnnBaseline);
        assert_eq!("CloneKNNMeanDiff".parse::<AlgorithmKind>()?, AlgorithmKind::CloneKnnMeanDiff);
        assert_eq!("msdclone".parse::<Measure>()?, Measure::MsdClone);
        assert_eq!("COS".parse::<Measure>()?, Measure::Cosine);
        assert_eq!("SGD".parse::<BaselineMethod>()?, BaselineMethod::Sgd);
        assert_eq!("Item".parse::<Basis>()?, Basis::Item);

        Ok(())
    }

    #[test]
    fn every_name_round_trips() -> Result<(), Error> {
        for kind in AlgorithmKind::ALL.iter() {
            assert_eq!(kind.name().parse::<AlgorithmKind>()?, *kind);
        }

        Ok(())
    }

    #[test]
    fn unknown_names() {
        assert!(matches!(
            "SVD".parse::<AlgorithmKind>(),
            Err(ErrorKind::UnknownAlgorithm(_))
        ));
        assert!(matches!(
            "jaccard".parse::<Measure>(),
            Err(ErrorKind::UnknownMeasure(_))
        ));
        assert!(matches!(
            "newton".parse::<BaselineMethod>(),
            Err(ErrorKind::UnknownMethod(_))
        ));
    }

    #[test]
    fn default_config_gives_default_options() -> Result<(), Error> {
        let options = Options::from_config(&Config::default())?;
        assert_eq!(options, Options::default());

        Ok(())
    }

    #[test]
    fn config_is_translated() -> Result<(), Error> {
        let mut config = Config::default();
        config.algorithm.name = "pattern".into();
        config.algorithm.item_based = true;
        config.baseline.method = "sgd".into();
        config.baseline.sgd.n_epochs = 3;
        config.evaluation.seed = Some(7);

        let options = Options::from_config(&config)?;
        assert_eq!(options.algorithm, AlgorithmKind::Pattern);
        assert_eq!(options.basis, Basis::Item);
        assert_eq!(options.baseline.method(), BaselineMethod::Sgd);
        assert_eq!(options.baseline.n_epochs(), 3);
        assert_eq!(options.seed, Some(7));

        Ok(())
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut config = Config::default();
        config.algorithm.k = 0;
        assert!(matches!(
            Options::from_config(&config),
            Err(ErrorKind::InvalidParameter { name: "k", .. })
        ));

        let mut config = Config::default();
        config.evaluation.folds = 1;
        assert!(matches!(
            Options::from_config(&config),
            Err(ErrorKind::InvalidParameter { name: "cv", .. })
        ));

        let mut config = Config::default();
        config.baseline.als.reg_i = -1.0;
        assert!(Options::from_config(&config).is_err());

        let mut config = Config::default();
        config.algorithm.sim = "euclidean".into();
        assert!(matches!(
            Options::from_config(&config),
            Err(ErrorKind::UnknownMeasure(_))
        ));
    }
}
