// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use controller::{parse::parse_fields, Controller, ErrorKind, RawRating};
use nom::{character::complete::space1, IResult};

fn blanks(input: &str) -> IResult<&str, &str> {
    space1(input)
}

/// Jester jokes, `user item rating` separated by blanks, continuous ratings
#[derive(Debug, Default, Clone, Copy)]
pub struct JesterController;

impl Controller for JesterController {
    fn name(&self) -> &'static str {
        "jester"
    }

    fn score_range(&self) -> (f64, f64) {
        (-10.0, 10.0)
    }

    fn default_file(&self) -> &'static str {
        "jester/jester_ratings.dat"
    }

    fn parse_record(&self, line: &str) -> Result<Option<RawRating>, ErrorKind> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        parse_fields(line, blanks).map(|fields| Some(fields.into_raw()))
    }
}
