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

use crate::training_data::Row;
use std::slice::Iter as SliceIter;

// The shortest row drives the iteration, the other one is only used for
// lookups. Values are always yielded as `(a, b)`, whichever row is shorter.
pub fn co_rated<'a>(a: Row<'a>, b: Row<'a>) -> CoRated<'a> {
    let swapped = a.len() > b.len();
    let (shortest, longest) = if swapped { (b, a) } else { (a, b) };

    CoRated {
        shortest: shortest.ratings.iter(),
        longest,
        swapped,
    }
}

#[derive(Debug)]
pub struct CoRated<'a> {
    shortest: SliceIter<'a, (usize, f64)>,
    longest: Row<'a>,
    swapped: bool,
}

impl<'a> Iterator for CoRated<'a> {
    type Item = (usize, (f64, f64));

    fn next(&mut self) -> Option<Self::Item> {
        let mut a_val = self.shortest.next()?;

        loop {
            if let Some(b_val) = self.longest.get(a_val.0) {
                let pair = if self.swapped {
                    (b_val, a_val.1)
                } else {
                    (a_val.1, b_val)
                };

                break Some((a_val.0, pair));
            } else {
                a_val = self.shortest.next()?;
            }
        }
    }
}

/// Collects the co-rated values of two rows, skipping `except` if given
pub fn co_rated_values(a: Row<'_>, b: Row<'_>, except: Option<usize>) -> Vec<(f64, f64)> {
    co_rated(a, b)
        .filter(|(id, _)| Some(*id) != except)
        .map(|(_, values)| values)
        .collect()
}

/// Accumulates `Σ w·v / Σ w`, nothing is returned until some weight is added
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedMean {
    num: f64,
    den: f64,
    n: usize,
}

impl WeightedMean {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, weight: f64, value: f64) {
        self.num += weight * value;
        self.den += weight;
        self.n += 1;
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn value(&self) -> Option<f64> {
        if self.n == 0 || self.den == 0.0 {
            None
        } else {
            Some(self.num / self.den)
        }
    }
}

pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = None;
    let mut n = 0;
    for value in values {
        *sum.get_or_insert(0.0) += value;
        n += 1;
    }

    sum.map(|sum| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_data::Ratings;
    use assert_approx_eq::*;
    use common_macros::hash_map;

    #[test]
    fn co_rated_iterator() {
        let a_list = vec![(0, 1.), (2, 2.), (3, 3.), (5, 4.)];
        let a_map: Ratings = a_list.iter().copied().collect();

        let b_list = vec![(5, 5.), (1, 6.), (2, 7.)];
        let b_map: Ratings = hash_map! {
            5 => 5.,
            1 => 6.,
            2 => 7.,
        };

        let a = Row {
            ratings: &a_list,
            lookup: &a_map,
        };
        let b = Row {
            ratings: &b_list,
            lookup: &b_map,
        };

        // b is shorter, so its order drives the iteration
        let pairs: Vec<_> = co_rated(a, b).collect();
        assert_eq!(pairs, vec![(5, (4., 5.)), (2, (2., 7.))]);

        let pairs: Vec<_> = co_rated(b, a).collect();
        assert_eq!(pairs, vec![(5, (5., 4.)), (2, (7., 2.))]);

        assert_eq!(co_rated_values(a, b, Some(5)), vec![(2., 7.)]);
    }

    #[test]
    fn weighted_mean() {
        let mut acc = WeightedMean::new();
        assert_eq!(acc.value(), None);

        acc.add(1.0, 4.0);
        acc.add(3.0, 2.0);
        assert_eq!(acc.len(), 2);
        assert_approx_eq!(acc.value().unwrap_or_default(), 2.5);
    }

    #[test]
    fn plain_mean() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_approx_eq!(mean(vec![1.0, 2.0, 6.0]).unwrap_or_default(), 3.0);
    }
}
