// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use books::BooksController;
use config::Config;
use controller::{Controller, ErrorKind, RawRating};
use jester::JesterController;
use movie_lens::{MovieLens100kController, MovieLens1mController};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Dataset {
    MovieLens100k,
    MovieLens1m,
    Books,
    Jester,
}

impl Dataset {
    pub const NAMES: [&'static str; 4] = ["ml-100k", "ml-1m", "BX", "jester"];

    pub fn controller(self) -> Box<dyn Controller> {
        match self {
            Dataset::MovieLens100k => Box::new(MovieLens100kController),
            Dataset::MovieLens1m => Box::new(MovieLens1mController),
            Dataset::Books => Box::new(BooksController),
            Dataset::Jester => Box::new(JesterController),
        }
    }
}

impl FromStr for Dataset {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ml-100k" => Ok(Dataset::MovieLens100k),
            "ml-1m" => Ok(Dataset::MovieLens1m),
            "bx" | "books" => Ok(Dataset::Books),
            "jester" => Ok(Dataset::Jester),
            _ => Err(ErrorKind::UnknownDataset(s.into())),
        }
    }
}

/// Where to read `dataset` from: the given file, the configured one or the
/// default location under `datasets/`
pub fn resolve_path(controller: &dyn Controller, file: Option<&Path>, config: &Config) -> PathBuf {
    if let Some(file) = file {
        return file.to_path_buf();
    }

    config
        .dataset_path(controller.name())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new("datasets").join(controller.default_file()))
}

pub fn get_raw_ratings(
    dataset: &str,
    file: Option<&Path>,
    config: &Config,
) -> Result<(Vec<RawRating>, Box<dyn Controller>), Error> {
    let controller = dataset.parse::<Dataset>()?.controller();
    let path = resolve_path(controller.as_ref(), file, config);

    log::info!("Loading {} ratings from {}", controller.name(), path.display());
    let ratings = controller.raw_ratings(&path)?;

    Ok((ratings, controller))
}
