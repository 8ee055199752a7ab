use anyhow::Error;
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    pub dataset: String,
    pub folds: usize,
    pub seed: Option<u64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            dataset: "ml-100k".into(),
            folds: 5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlgorithmConfig {
    pub name: String,
    pub k: usize,
    pub sim: String,
    pub min_support: usize,
    pub item_based: bool,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            name: "KNNBaseline".into(),
            k: 40,
            sim: "MSD".into(),
            min_support: 1,
            item_based: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlsConfig {
    pub n_epochs: usize,
    pub reg_u: f64,
    pub reg_i: f64,
}

impl Default for AlsConfig {
    fn default() -> Self {
        Self {
            n_epochs: 10,
            reg_u: 15.0,
            reg_i: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SgdConfig {
    pub n_epochs: usize,
    pub learning_rate: f64,
    pub regularization: f64,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            n_epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BaselineConfig {
    pub method: String,
    pub als: AlsConfig,
    pub sgd: SgdConfig,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            method: "als".into(),
            als: AlsConfig::default(),
            sgd: SgdConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalogyConfig {
    pub n_samples: usize,
    pub min_common: usize,
}

impl Default for AnalogyConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            min_common: 3,
        }
    }
}

/// Values to try for each parameter, an empty list keeps the base value
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub algorithm: Vec<String>,
    pub k: Vec<usize>,
    pub sim: Vec<String>,
    pub min_support: Vec<usize>,
    pub item_based: Vec<bool>,
    pub method: Vec<String>,
    /// Baseline regularization, sets both ALS terms and the SGD one
    pub reg: Vec<f64>,
    pub measure: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            algorithm: Vec::new(),
            k: Vec::new(),
            sim: Vec::new(),
            min_support: Vec::new(),
            item_based: Vec::new(),
            method: Vec::new(),
            reg: Vec::new(),
            measure: "rmse".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub evaluation: EvaluationConfig,
    pub algorithm: AlgorithmConfig,
    pub baseline: BaselineConfig,
    pub analogy: AnalogyConfig,
    pub grid: Option<GridConfig>,
    pub datasets: HashMap<String, PathBuf>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, Error> {
        let parsed: Self = toml::from_str(contents)?;
        Ok(parsed)
    }

    /// Where the ratings of a dataset live, if the configuration says so
    pub fn dataset_path(&self, name: &str) -> Option<&Path> {
        self.datasets.get(name).map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use common_macros::hash_map;

    #[test]
    fn load_example_config() -> Result<(), Error> {
        let expected = Config {
            evaluation: EvaluationConfig {
                dataset: "ml-100k".into(),
                folds: 3,
                seed: Some(42),
            },
            algorithm: AlgorithmConfig {
                name: "KNNWithMeans".into(),
                k: 30,
                sim: "pearson".into(),
                min_support: 5,
                item_based: true,
            },
            baseline: BaselineConfig {
                method: "sgd".into(),
                als: AlsConfig::default(),
                sgd: SgdConfig {
                    n_epochs: 15,
                    learning_rate: 0.007,
                    regularization: 0.05,
                },
            },
            analogy: AnalogyConfig {
                n_samples: 500,
                min_common: 3,
            },
            grid: Some(GridConfig {
                k: vec![20, 40],
                sim: vec!["cos".into(), "MSD".into()],
                ..GridConfig::default()
            }),
            datasets: hash_map! {
                "ml-100k".into() => PathBuf::from("datasets/ml-100k/u.data"),
                "jester".into() => PathBuf::from("datasets/jester/jester_ratings.dat"),
            },
        };

        let loaded = Config::load("example.toml")?;
        assert_eq!(expected, loaded);

        Ok(())
    }

    #[test]
    fn empty_config_is_default() -> Result<(), Error> {
        let parsed = Config::parse("")?;

        assert_eq!(parsed, Config::default());
        assert_eq!(parsed.algorithm.name, "KNNBaseline");
        assert_eq!(parsed.algorithm.k, 40);
        assert_eq!(parsed.evaluation.folds, 5);
        assert!(parsed.grid.is_none());

        Ok(())
    }

    #[test]
    fn partial_sections_keep_defaults() -> Result<(), Error> {
        let parsed = Config::parse("[baseline.als]\nn_epochs = 0\n")?;

        assert_eq!(parsed.baseline.als.n_epochs, 0);
        assert_eq!(parsed.baseline.als.reg_u, 15.0);
        assert_eq!(parsed.baseline.method, "als");

        Ok(())
    }

    #[test]
    fn dataset_paths() -> Result<(), Error> {
        let parsed = Config::parse("[datasets]\nBX = \"/data/bx.csv\"\n")?;

        assert_eq!(parsed.dataset_path("BX"), Some(Path::new("/data/bx.csv")));
        assert_eq!(parsed.dataset_path("ml-1m"), None);

        Ok(())
    }

    #[test]
    fn grid_lists() -> Result<(), Error> {
        let parsed = Config::parse(
            "[grid]\nmethod = [\"als\", \"sgd\"]\nreg = [1.0, 2.5]\nitem_based = [false]\nmeasure = \"FCP\"\n",
        )?;

        let grid = parsed.grid.unwrap_or_default();
        assert_eq!(grid.method, vec!["als".to_string(), "sgd".to_string()]);
        assert_eq!(grid.reg, vec![1.0, 2.5]);
        assert_eq!(grid.item_based, vec![false]);
        assert_eq!(grid.measure, "FCP");
        assert!(grid.k.is_empty());

        Ok(())
    }

    #[test]
    fn wrong_types_fail() {
        assert!(Config::parse("[algorithm]\nk = \"many\"\n").is_err());
    }
}
