// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

//! Small `nom` parsers shared by the line oriented dataset formats.

use crate::{error::ErrorKind, RawRating};
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, digit1};
use nom::combinator::{map_res, opt, recognize};
use nom::sequence::{pair, preceded, tuple};
use nom::IResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Fields<'a> {
    pub user: &'a str,
    pub item: &'a str,
    pub rating: f64,
    pub timestamp: Option<i64>,
}

impl Fields<'_> {
    pub fn into_raw(self) -> RawRating {
        RawRating {
            user: self.user.to_owned(),
            item: self.item.to_owned(),
            rating: self.rating,
            timestamp: self.timestamp,
        }
    }
}

pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != ':')(input)
}

pub fn parse_float(input: &str) -> IResult<&str, f64> {
    map_res(
        take_while1(|c: char| c.is_ascii_digit() || "+-.eE".contains(c)),
        |s: &str| s.parse::<f64>(),
    )(input)
}

pub fn parse_number(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// Parse `user <sep> item <sep> rating [<sep> timestamp]`, the whole
/// (trimmed) line must be consumed.
pub fn parse_fields<'a, S>(line: &'a str, sep: S) -> Result<Fields<'a>, ErrorKind>
where
    S: Fn(&'a str) -> IResult<&'a str, &'a str> + Copy,
{
    let input = line.trim();
    let parsed: IResult<&str, _> = tuple((
        parse_ident,
        sep,
        parse_ident,
        sep,
        parse_float,
        opt(preceded(sep, parse_number)),
    ))(input);

    match parsed {
        Ok((rest, (user, _, item, _, rating, timestamp))) if rest.trim().is_empty() => {
            Ok(Fields {
                user,
                item,
                rating,
                timestamp,
            })
        }
        _ => Err(ErrorKind::malformed(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::bytes::complete::tag;
    use nom::character::complete::space1;

    fn tab(input: &str) -> IResult<&str, &str> {
        tag("\t")(input)
    }

    #[test]
    fn test_parse_idents() {
        let parsed = parse_ident("196\t242");
        let expected = ("\t242", "196");

        assert_eq!(parsed, Ok(expected));

        let parsed = parse_ident("034545104X::5");
        let expected = ("::5", "034545104X");

        assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_number("881250949"), Ok(("", 881250949)));
        assert_eq!(parse_number("-12c3"), Ok(("c3", -12)));
        assert_eq!(parse_float("-7.82 "), Ok((" ", -7.82)));
        assert_eq!(parse_float("4"), Ok(("", 4.0)));
    }

    #[test]
    fn fields_with_timestamp() -> Result<(), ErrorKind> {
        let fields = parse_fields("196\t242\t3\t881250949\n", tab)?;

        assert_eq!(fields.user, "196");
        assert_eq!(fields.item, "242");
        assert_eq!(fields.rating, 3.0);
        assert_eq!(fields.timestamp, Some(881250949));

        Ok(())
    }

    #[test]
    fn fields_without_timestamp() -> Result<(), ErrorKind> {
        let fields = parse_fields("1 5 -9.281", space1)?;

        assert_eq!(fields.item, "5");
        assert_eq!(fields.rating, -9.281);
        assert_eq!(fields.timestamp, None);

        Ok(())
    }

    #[test]
    fn trailing_garbage_is_malformed() {
        assert!(parse_fields("196\t242\t3\t881250949\tfoo", tab).is_err());
        assert!(parse_fields("196\t242", tab).is_err());
    }
}
