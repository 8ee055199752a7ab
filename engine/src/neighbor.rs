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

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

type MinHeap<T> = BinaryHeap<Reverse<T>>;

/// A candidate neighbor of the target and its rating for the target `y`.
///
/// Neighbors are ordered by similarity, equal similarities prefer the lowest
/// id so the selection doesn't depend on iteration order.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub id: usize,
    pub sim: f64,
    pub rating: f64,
}

impl Neighbor {
    pub fn new(id: usize, sim: f64, rating: f64) -> Self {
        Self { id, sim, rating }
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sim
            .partial_cmp(&other.sim)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// The `k` most similar candidates, most similar first
pub fn k_nearest<I>(candidates: I, k: usize) -> Vec<Neighbor>
where
    I: IntoIterator<Item = Neighbor>,
{
    let mut min_heap: MinHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);
    if k == 0 {
        return Vec::new();
    }

    for neighbor in candidates {
        if min_heap.len() < k {
            min_heap.push(Reverse(neighbor));
        } else if let Some(minimum) = min_heap.peek() {
            if neighbor > minimum.0 {
                min_heap.pop();
                min_heap.push(Reverse(neighbor));
            }
        }
    }

    // Sorting the reversed values leaves the greatest first
    min_heap
        .into_sorted_vec()
        .into_iter()
        .map(|r| r.0)
        .collect()
}
