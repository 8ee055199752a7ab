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

use crate::error::ErrorKind;
use controller::{RatingScale, RawRating, Reader};
use std::{
    collections::HashMap,
    fmt::{self, Display},
    str::FromStr,
};

/// Maps an inner id (item for a user row, user for an item row) to a rating
pub type Ratings = HashMap<usize, f64>;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Kind {
    User,
    Item,
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::User => write!(f, "user"),
            Kind::Item => write!(f, "item"),
        }
    }
}

/// Which entities the neighborhood algorithms compare.
///
/// Every neighbor based algorithm is written in terms of `x` (the entities
/// being compared) and `y` (what they rated). A user basis makes `x` a user
/// and `y` an item, an item basis swaps both roles.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Basis {
    User,
    Item,
}

impl Basis {
    pub fn from_item_based(item_based: bool) -> Self {
        if item_based {
            Basis::Item
        } else {
            Basis::User
        }
    }

    /// `(x, y)` coordinates of a `(user, item)` pair
    pub fn orient(self, user: usize, item: usize) -> (usize, usize) {
        match self {
            Basis::User => (user, item),
            Basis::Item => (item, user),
        }
    }

    /// `(user, item)` pair of some `(x, y)` coordinates
    pub fn user_item(self, x: usize, y: usize) -> (usize, usize) {
        self.orient(x, y)
    }

    pub fn name(self) -> &'static str {
        match self {
            Basis::User => "user",
            Basis::Item => "item",
        }
    }
}

impl FromStr for Basis {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Basis::User),
            "item" => Ok(Basis::Item),
            _ => Err(ErrorKind::UnknownBasis(s.into())),
        }
    }
}

/// Dense ids, assigned in first seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdIndex {
    raw_to_inner: HashMap<String, usize>,
    inner_to_raw: Vec<String>,
}

impl IdIndex {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get_or_insert(&mut self, raw: &str) -> usize {
        if let Some(inner) = self.raw_to_inner.get(raw) {
            return *inner;
        }

        let inner = self.inner_to_raw.len();
        self.raw_to_inner.insert(raw.to_owned(), inner);
        self.inner_to_raw.push(raw.to_owned());
        inner
    }

    pub fn to_inner(&self, raw: &str) -> Option<usize> {
        self.raw_to_inner.get(raw).copied()
    }

    pub fn to_raw(&self, inner: usize) -> Option<&str> {
        self.inner_to_raw.get(inner).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner_to_raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner_to_raw.is_empty()
    }
}

/// Ratings of one entity, both in insertion order and by id
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub ratings: &'a [(usize, f64)],
    pub lookup: &'a Ratings,
}

impl Row<'_> {
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<f64> {
        self.lookup.get(&id).copied()
    }
}

/// The ratings of one training split, indexed by inner ids.
#[derive(Debug, Clone)]
pub struct TrainingData {
    users: IdIndex,
    items: IdIndex,

    ratings: Vec<(usize, usize, f64)>,
    ur: Vec<Vec<(usize, f64)>>,
    ir: Vec<Vec<(usize, f64)>>,
    ur_lookup: Vec<Ratings>,
    ir_lookup: Vec<Ratings>,

    user_means: Vec<f64>,
    item_means: Vec<f64>,
    global_mean: f64,
    rating_std: f64,
    scale: RatingScale,
}

fn means(rows: &[Vec<(usize, f64)>]) -> Vec<f64> {
    rows.iter()
        .map(|row| row.iter().map(|(_, r)| r).sum::<f64>() / row.len() as f64)
        .collect()
}

fn lookups(rows: &[Vec<(usize, f64)>]) -> Vec<Ratings> {
    rows.iter().map(|row| row.iter().copied().collect()).collect()
}

impl TrainingData {
    pub fn build(raw_ratings: &[RawRating], scale: RatingScale) -> Result<Self, ErrorKind> {
        if raw_ratings.is_empty() {
            return Err(ErrorKind::EmptyRatings);
        }

        let mut users = IdIndex::new();
        let mut items = IdIndex::new();
        let mut ratings: Vec<(usize, usize, f64)> = Vec::with_capacity(raw_ratings.len());
        let mut positions: HashMap<(usize, usize), usize> = HashMap::with_capacity(raw_ratings.len());

        // A pair rated more than once keeps its last rating
        for raw in raw_ratings {
            let u = users.get_or_insert(&raw.user);
            let i = items.get_or_insert(&raw.item);

            match positions.get(&(u, i)) {
                Some(&pos) => {
                    log::debug!("Duplicated rating ({}, {}), keeping the last one", raw.user, raw.item);
                    ratings[pos].2 = raw.rating;
                }
                None => {
                    positions.insert((u, i), ratings.len());
                    ratings.push((u, i, raw.rating));
                }
            }
        }

        let mut ur: Vec<Vec<(usize, f64)>> = vec![Vec::new(); users.len()];
        let mut ir: Vec<Vec<(usize, f64)>> = vec![Vec::new(); items.len()];
        for &(u, i, r) in &ratings {
            ur[u].push((i, r));
            ir[i].push((u, r));
        }

        let n = ratings.len() as f64;
        let global_mean = ratings.iter().map(|(_, _, r)| r).sum::<f64>() / n;
        let variance = ratings
            .iter()
            .map(|(_, _, r)| (r - global_mean).powi(2))
            .sum::<f64>()
            / n;

        log::debug!(
            "Training data with {} users, {} items and {} ratings",
            users.len(),
            items.len(),
            ratings.len()
        );

        Ok(Self {
            user_means: means(&ur),
            item_means: means(&ir),
            ur_lookup: lookups(&ur),
            ir_lookup: lookups(&ir),
            users,
            items,
            ratings,
            ur,
            ir,
            global_mean,
            rating_std: variance.sqrt(),
            scale,
        })
    }

    pub fn from_reader(reader: &Reader) -> Result<Self, ErrorKind> {
        Self::build(&reader.ratings, reader.scale)
    }

    pub fn to_inner(&self, raw: &str, kind: Kind) -> Result<usize, ErrorKind> {
        let index = match kind {
            Kind::User => &self.users,
            Kind::Item => &self.items,
        };

        index
            .to_inner(raw)
            .ok_or_else(|| ErrorKind::UnknownIdentifier {
                kind,
                raw: raw.to_owned(),
            })
    }

    pub fn to_raw(&self, inner: usize, kind: Kind) -> Option<&str> {
        match kind {
            Kind::User => self.users.to_raw(inner),
            Kind::Item => self.items.to_raw(inner),
        }
    }

    pub fn users(&self) -> &IdIndex {
        &self.users
    }

    pub fn items(&self) -> &IdIndex {
        &self.items
    }

    pub fn n_users(&self) -> usize {
        self.ur.len()
    }

    pub fn n_items(&self) -> usize {
        self.ir.len()
    }

    pub fn n_ratings(&self) -> usize {
        self.ratings.len()
    }

    pub fn global_mean(&self) -> f64 {
        self.global_mean
    }

    /// Population standard deviation of every training rating
    pub fn rating_std(&self) -> f64 {
        self.rating_std
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Every `(user, item, rating)` in the order they were given
    pub fn all_ratings(&self) -> &[(usize, usize, f64)] {
        &self.ratings
    }

    pub fn user_ratings(&self, user: usize) -> &[(usize, f64)] {
        &self.ur[user]
    }

    pub fn item_ratings(&self, item: usize) -> &[(usize, f64)] {
        &self.ir[item]
    }

    pub fn user_mean(&self, user: usize) -> f64 {
        self.user_means[user]
    }

    pub fn item_mean(&self, item: usize) -> f64 {
        self.item_means[item]
    }

    pub fn xr(&self, basis: Basis) -> &[Vec<(usize, f64)>] {
        match basis {
            Basis::User => &self.ur,
            Basis::Item => &self.ir,
        }
    }

    pub fn yr(&self, basis: Basis) -> &[Vec<(usize, f64)>] {
        match basis {
            Basis::User => &self.ir,
            Basis::Item => &self.ur,
        }
    }

    pub fn n_x(&self, basis: Basis) -> usize {
        self.xr(basis).len()
    }

    pub fn x_row(&self, basis: Basis, x: usize) -> Row<'_> {
        let (rows, lookups) = match basis {
            Basis::User => (&self.ur, &self.ur_lookup),
            Basis::Item => (&self.ir, &self.ir_lookup),
        };

        Row {
            ratings: &rows[x],
            lookup: &lookups[x],
        }
    }

    pub fn x_mean(&self, basis: Basis, x: usize) -> f64 {
        match basis {
            Basis::User => self.user_means[x],
            Basis::Item => self.item_means[x],
        }
    }
}
