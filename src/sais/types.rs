/* Copyright 2021 Google LLC
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

/* This code is based on suffix from BurntSushi. The original program was
 * licensed under the MIT license. It has been modified to work on dense
 * symbol ranks with a tagged sentinel instead of raw bytes.
 */

use crate::alphabet::Symbol;

use self::SuffixType::{Ascending, Descending, Valley};

/// Classification of a suffix relative to the suffix one position to its right.
///
/// `Ascending` is the classic S-type, `Descending` the L-type, and `Valley`
/// marks an S-type suffix whose left neighbour is L-type (an LMS position).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuffixType {
    Ascending,
    Descending,
    Valley,
}

impl SuffixType {
    #[inline]
    pub fn is_asc(self) -> bool {
        matches!(self, Ascending | Valley)
    }

    #[inline]
    pub fn is_desc(self) -> bool {
        matches!(self, Descending)
    }

    #[inline]
    pub fn is_valley(self) -> bool {
        matches!(self, Valley)
    }

    fn inherit(self) -> SuffixType {
        match self {
            Valley => Ascending,
            _ => self,
        }
    }
}

/// Type labels for every position of a sentinel-terminated text.
#[derive(Clone, Debug)]
pub struct SuffixTypes {
    types: Vec<SuffixType>,
}

impl SuffixTypes {
    /// Labels each position in a single right-to-left scan. A position is
    /// promoted to `Valley` as soon as its left neighbour turns out to be
    /// descending, so position 0 is never a valley.
    pub fn classify(text: &[Symbol]) -> SuffixTypes {
        let n = text.len();
        let mut types = vec![Ascending; n];
        if n == 0 {
            return SuffixTypes { types };
        }

        for i in (0..n - 1).rev() {
            types[i] = if text[i] < text[i + 1] {
                Ascending
            } else if text[i] > text[i + 1] {
                Descending
            } else {
                types[i + 1].inherit()
            };
            if types[i].is_desc() && types[i + 1].is_asc() {
                types[i + 1] = Valley;
            }
        }
        SuffixTypes { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub fn ty(&self, i: usize) -> SuffixType {
        self.types[i]
    }

    #[inline]
    pub fn is_asc(&self, i: usize) -> bool {
        self.ty(i).is_asc()
    }

    #[inline]
    pub fn is_desc(&self, i: usize) -> bool {
        self.ty(i).is_desc()
    }

    #[inline]
    pub fn is_valley(&self, i: usize) -> bool {
        self.ty(i).is_valley()
    }

    /// Valley positions in text order.
    pub fn valleys(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.is_valley(i)).collect()
    }
}
