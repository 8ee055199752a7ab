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
use rand::{seq::SliceRandom, Rng};

/// One train/test partition
#[derive(Debug, Clone, PartialEq)]
pub struct Fold<T> {
    pub index: usize,
    pub trainset: Vec<T>,
    pub testset: Vec<T>,
}

/// Shuffles once, then yields `k` folds over contiguous ranges of the
/// shuffled ratings. The first `len % k` folds hold one more rating.
#[derive(Debug)]
pub struct KFolds<T> {
    items: Vec<T>,
    k: usize,
    current: usize,
    start: usize,
}

impl<T: Clone> KFolds<T> {
    pub fn new<R>(mut items: Vec<T>, k: usize, rng: &mut R) -> Result<Self, ErrorKind>
    where
        R: Rng + ?Sized,
    {
        if k < 2 {
            return Err(ErrorKind::invalid("cv", "at least 2 folds are needed"));
        }

        if k > items.len() {
            return Err(ErrorKind::invalid(
                "cv",
                format!("can't split {} ratings in {} folds", items.len(), k),
            ));
        }

        items.shuffle(rng);
        Ok(Self {
            items,
            k,
            current: 0,
            start: 0,
        })
    }

    pub fn fold_size(&self, index: usize) -> usize {
        let len = self.items.len();
        len / self.k + if index < len % self.k { 1 } else { 0 }
    }
}

impl<T: Clone> Iterator for KFolds<T> {
    type Item = Fold<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.k {
            return None;
        }

        let stop = self.start + self.fold_size(self.current);
        let testset = self.items[self.start..stop].to_vec();
        let mut trainset = Vec::with_capacity(self.items.len() - testset.len());
        trainset.extend_from_slice(&self.items[..self.start]);
        trainset.extend_from_slice(&self.items[stop..]);

        let fold = Fold {
            index: self.current,
            trainset,
            testset,
        };

        self.current += 1;
        self.start = stop;
        Some(fold)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.k - self.current;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for KFolds<T> {}
