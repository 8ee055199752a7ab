// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Malformed record at line {line}: {record:?}")]
    MalformedRecord { line: usize, record: String },

    #[error("Unknown dataset ({0})")]
    UnknownDataset(String),

    #[error("Couldn't cast value to {0}")]
    CastingValue(&'static str),
}

impl ErrorKind {
    /// A malformed record whose line number is filled in by the caller
    pub fn malformed(record: &str) -> Self {
        Self::MalformedRecord {
            line: 0,
            record: record.to_owned(),
        }
    }
}
