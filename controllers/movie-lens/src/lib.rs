// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use controller::{parse::parse_fields, Controller, ErrorKind, RawRating};
use nom::{bytes::complete::tag, IResult};

fn tab(input: &str) -> IResult<&str, &str> {
    tag("\t")(input)
}

fn double_colon(input: &str) -> IResult<&str, &str> {
    tag("::")(input)
}

/// MovieLens 100k, `u.data` lines are `user \t item \t rating \t timestamp`
#[derive(Debug, Default, Clone, Copy)]
pub struct MovieLens100kController;

impl Controller for MovieLens100kController {
    fn name(&self) -> &'static str {
        "ml-100k"
    }

    fn score_range(&self) -> (f64, f64) {
        (1.0, 5.0)
    }

    fn default_file(&self) -> &'static str {
        "ml-100k/u.data"
    }

    fn parse_record(&self, line: &str) -> Result<Option<RawRating>, ErrorKind> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        parse_fields(line, tab).map(|fields| Some(fields.into_raw()))
    }
}

/// MovieLens 1M, `ratings.dat` lines are `user::item::rating::timestamp`
#[derive(Debug, Default, Clone, Copy)]
pub struct MovieLens1mController;

impl Controller for MovieLens1mController {
    fn name(&self) -> &'static str {
        "ml-1m"
    }

    fn score_range(&self) -> (f64, f64) {
        (1.0, 5.0)
    }

    fn default_file(&self) -> &'static str {
        "ml-1m/ratings.dat"
    }

    fn parse_record(&self, line: &str) -> Result<Option<RawRating>, ErrorKind> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        parse_fields(line, double_colon).map(|fields| Some(fields.into_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use assert_approx_eq::*;
    use std::{env, fs, process};

    #[test]
    fn ml_100k_record() -> Result<(), Error> {
        let rating = MovieLens100kController
            .parse_record("196\t242\t3\t881250949")?
            .expect("a rating");

        assert_eq!(rating.user, "196");
        assert_eq!(rating.item, "242");
        assert_approx_eq!(rating.rating, 3.0);
        assert_eq!(rating.timestamp, Some(881250949));

        Ok(())
    }

    #[test]
    fn ml_1m_record() -> Result<(), Error> {
        let rating = MovieLens1mController
            .parse_record("1::1193::5::978300760\r")?
            .expect("a rating");

        assert_eq!(rating.user, "1");
        assert_eq!(rating.item, "1193");
        assert_approx_eq!(rating.rating, 5.0);

        Ok(())
    }

    #[test]
    fn blank_lines_are_skipped() -> Result<(), Error> {
        assert!(MovieLens100kController.parse_record("   ")?.is_none());
        assert!(MovieLens1mController.parse_record("")?.is_none());

        Ok(())
    }

    #[test]
    fn wrong_separator_is_malformed() {
        assert!(MovieLens100kController
            .parse_record("1::1193::5::978300760")
            .is_err());
        assert!(MovieLens1mController
            .parse_record("196\t242\t3\t881250949")
            .is_err());
    }

    #[test]
    fn reads_whole_file() -> Result<(), Error> {
        let path = env::temp_dir().join(format!("ml-100k-{}.data", process::id()));
        fs::write(&path, "196\t242\t3\t881250949\n186\t302\t3\t891717742\n\n")?;

        let ratings = MovieLens100kController.raw_ratings(&path);
        fs::remove_file(&path)?;

        let ratings = ratings?;
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].user, "186");

        Ok(())
    }

    #[test]
    fn malformed_line_reports_its_number() -> Result<(), Error> {
        let path = env::temp_dir().join(format!("ml-1m-{}.dat", process::id()));
        fs::write(&path, "1::1193::5::978300760\n1::oops\n")?;

        let result = MovieLens1mController.raw_ratings(&path);
        fs::remove_file(&path)?;

        let message = result.expect_err("second line is malformed").to_string();
        assert!(message.contains("line 2"));

        Ok(())
    }
}
