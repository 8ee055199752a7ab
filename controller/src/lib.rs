// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod error;
pub mod parse;
pub mod table;
pub mod values;

use anyhow::Error;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

pub use error::ErrorKind;
pub use table::ToTable;
pub use values::Value;

pub type Result<T> = std::result::Result<T, Error>;

/// A single observation as it comes out of a dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRating {
    pub user: String,
    pub item: String,
    pub rating: f64,
    pub timestamp: Option<i64>,
}

impl RawRating {
    pub fn new(user: impl Into<String>, item: impl Into<String>, rating: f64) -> Self {
        Self {
            user: user.into(),
            item: item.into(),
            rating,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Inclusive bounds of the ratings a dataset can hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl RatingScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl From<(f64, f64)> for RatingScale {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Raw ratings bundled with the scale of the dataset they were read from.
#[derive(Debug, Clone)]
pub struct Reader {
    pub ratings: Vec<RawRating>,
    pub scale: RatingScale,
}

impl Reader {
    pub fn new(ratings: Vec<RawRating>, scale: RatingScale) -> Self {
        Self { ratings, scale }
    }
}

pub trait Controller {
    /// The dataset name used to select this controller, ex. "ml-100k"
    fn name(&self) -> &'static str;

    /// The controller score range, ex. (1.0, 5.0) is (min_rating, max_rating)
    fn score_range(&self) -> (f64, f64);

    /// File name of the ratings inside the dataset directory
    fn default_file(&self) -> &'static str;

    /// Parse a single line, `Ok(None)` means the line holds no rating
    fn parse_record(&self, line: &str) -> std::result::Result<Option<RawRating>, ErrorKind>;

    /// Read every rating stored in the given file
    fn raw_ratings(&self, path: &Path) -> Result<Vec<RawRating>> {
        let reader = BufReader::new(File::open(path)?);

        let mut ratings = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            match self.parse_record(&line) {
                Ok(Some(rating)) => ratings.push(rating),
                Ok(None) => continue,
                Err(ErrorKind::MalformedRecord { record, .. }) => {
                    return Err(ErrorKind::MalformedRecord {
                        line: number + 1,
                        record,
                    }
                    .into())
                }
                Err(e) => return Err(e.into()),
            }
        }

        log::debug!(
            "Read {} ratings from {} ({})",
            ratings.len(),
            path.display(),
            self.name()
        );

        Ok(ratings)
    }

    /// Bundle raw ratings with this dataset scale
    fn reader(&self, ratings: Vec<RawRating>) -> Reader {
        Reader::new(ratings, self.score_range().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::*;

    #[test]
    fn scale_clamps_out_of_range_values() {
        let scale = RatingScale::new(1.0, 5.0);

        assert_approx_eq!(scale.clamp(7.2), 5.0);
        assert_approx_eq!(scale.clamp(-3.0), 1.0);
        assert_approx_eq!(scale.clamp(3.3), 3.3);
        assert_approx_eq!(scale.span(), 4.0);
        assert!(scale.contains(1.0));
        assert!(!scale.contains(5.01));
    }

    #[test]
    fn reader_keeps_controller_scale() {
        struct Dummy;

        impl Controller for Dummy {
            fn name(&self) -> &'static str {
                "dummy"
            }

            fn score_range(&self) -> (f64, f64) {
                (-10.0, 10.0)
            }

            fn default_file(&self) -> &'static str {
                "dummy.dat"
            }

            fn parse_record(
                &self,
                _line: &str,
            ) -> std::result::Result<Option<RawRating>, ErrorKind> {
                Ok(None)
            }
        }

        let reader = Dummy.reader(vec![RawRating::new("1", "2", 3.5)]);
        assert_eq!(reader.ratings.len(), 1);
        assert_eq!(reader.scale, RatingScale::new(-10.0, 10.0));
    }
}
