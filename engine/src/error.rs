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

use crate::training_data::Kind;
use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Tried to divide by zero")]
    DivisionByZero,

    #[error("Indeterminate form 0/0")]
    IndeterminateForm,

    #[error("Empty ratings")]
    EmptyRatings,

    #[error("Empty predictions, cannot compute accuracy")]
    EmptyPredictions,

    #[error("Couldn't get similarity, no matching ratings")]
    NoMatchingRatings,

    #[error("Empty k nearest neighbors")]
    EmptyKNearestNeighbors,

    #[error("Unknown {kind} ({raw}), it wasn't part of the training set")]
    UnknownIdentifier { kind: Kind, raw: String },

    #[error("Unknown prediction algorithm ({0})")]
    UnknownAlgorithm(String),

    #[error("Unknown similarity measure ({0})")]
    UnknownMeasure(String),

    #[error("Unknown baseline method ({0})")]
    UnknownMethod(String),

    #[error("Unknown basis ({0}), expected user or item")]
    UnknownBasis(String),

    #[error("Unknown accuracy measure ({0})")]
    UnknownAccuracy(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Couldn't build rating distribution: {0}")]
    Distribution(String),
}

impl ErrorKind {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
