// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use controller::{Controller, ErrorKind, RawRating};
use csv::{ByteRecord, ReaderBuilder};
use std::{io::Read, path::Path};

/// Book-Crossing, `"User-ID";"ISBN";"Book-Rating"` with a header line.
///
/// A zero rating is an implicit interaction (the book was seen but not
/// rated), those are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooksController;

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(b';')
        .flexible(true)
        .double_quote(true);
    builder
}

fn from_record(record: &ByteRecord) -> Result<Option<RawRating>, ErrorKind> {
    let field = |i: usize| record.get(i).map(String::from_utf8_lossy);
    let line = || String::from_utf8_lossy(record.as_slice()).into_owned();

    let (user, item, score) = match (field(0), field(1), field(2)) {
        (Some(user), Some(item), Some(score)) => (user, item, score),
        _ => return Err(ErrorKind::malformed(&line())),
    };

    if user.trim() == "User-ID" {
        return Ok(None);
    }

    let score: f64 = score
        .trim()
        .parse()
        .map_err(|_| ErrorKind::malformed(&line()))?;

    if score == 0.0 {
        return Ok(None);
    }

    Ok(Some(RawRating::new(user.trim(), item.trim(), score)))
}

fn read_all<R: Read>(reader: R) -> Result<Vec<RawRating>, Error> {
    let mut csv = builder().from_reader(reader);

    let mut ratings = Vec::new();
    let mut implicit = 0;
    for (number, record) in csv.byte_records().enumerate() {
        let record = record?;
        match from_record(&record) {
            Ok(Some(rating)) => ratings.push(rating),
            Ok(None) => implicit += 1,
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

    log::debug!("Skipped {} implicit or header records", implicit);
    Ok(ratings)
}

impl Controller for BooksController {
    fn name(&self) -> &'static str {
        "BX"
    }

    fn score_range(&self) -> (f64, f64) {
        (1.0, 10.0)
    }

    fn default_file(&self) -> &'static str {
        "BX-CSV-Dump/BX-Book-Ratings.csv"
    }

    fn parse_record(&self, line: &str) -> Result<Option<RawRating>, ErrorKind> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let mut csv = builder().from_reader(line.as_bytes());
        let mut record = ByteRecord::new();
        match csv.read_byte_record(&mut record) {
            Ok(true) => from_record(&record),
            Ok(false) => Ok(None),
            Err(_) => Err(ErrorKind::malformed(line)),
        }
    }

    // The dump is latin-1 encoded, so it can't be read line by line as utf-8
    fn raw_ratings(&self, path: &Path) -> Result<Vec<RawRating>, Error> {
        let ratings = read_all(std::fs::File::open(path)?)?;
        log::debug!("Read {} ratings from {}", ratings.len(), path.display());
        Ok(ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_record() -> Result<(), Error> {
        let rating = BooksController
            .parse_record("\"276726\";\"0155061224\";\"5\"")?
            .expect("a rating");

        assert_eq!(rating.user, "276726");
        assert_eq!(rating.item, "0155061224");
        assert_eq!(rating.rating, 5.0);

        Ok(())
    }

    #[test]
    fn header_and_implicit_ratings_are_skipped() -> Result<(), Error> {
        assert!(BooksController
            .parse_record("\"User-ID\";\"ISBN\";\"Book-Rating\"")?
            .is_none());
        assert!(BooksController
            .parse_record("\"276725\";\"034545104X\";\"0\"")?
            .is_none());

        Ok(())
    }

    #[test]
    fn latin1_bytes_are_accepted() -> Result<(), Error> {
        let mut dump = b"\"User-ID\";\"ISBN\";\"Book-Rating\"\n".to_vec();
        dump.extend_from_slice(b"\"276744\";\"038550120X\";\"7\"\n");
        dump.extend_from_slice(b"\"276745\";\"34\xe9\";\"10\"\n");
        dump.extend_from_slice(b"\"276746\";\"0425115801\";\"0\"\n");

        let ratings = read_all(dump.as_slice())?;
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].rating, 10.0);

        Ok(())
    }

    #[test]
    fn non_numeric_rating_is_malformed() {
        let dump = b"\"276744\";\"038550120X\";\"great\"\n";
        assert!(read_all(&dump[..]).is_err());
    }
}
