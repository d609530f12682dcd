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
use crate::sais::types::SuffixTypes;

/// Marker for a slot of the suffix array that has not been filled yet.
pub const EMPTY: usize = usize::MAX;

/// Bucket boundaries derived from the symbol-count histogram of a text.
///
/// Every pass asks for a fresh set of head or tail pointers, so no pointer
/// state leaks from one pass into the next.
#[derive(Clone, Debug)]
pub struct Buckets {
    sizes: Vec<usize>,
}

impl Buckets {
    pub fn histogram(text: &[Symbol]) -> Buckets {
        let mut sizes = Vec::new();
        for c in text {
            let b = c.bucket();
            if b >= sizes.len() {
                sizes.resize(b + 1, 0);
            }
            sizes[b] += 1;
        }
        Buckets { sizes }
    }

    #[inline]
    pub fn size(&self, b: usize) -> usize {
        self.sizes[b]
    }

    /// True when every bucket holds exactly one symbol, i.e. the text is
    /// already a permutation of its bucket indices.
    pub fn is_injective(&self) -> bool {
        self.sizes.iter().all(|&size| size == 1)
    }

    /// First slot of each bucket.
    pub fn heads(&self) -> Vec<usize> {
        let mut sum = 0;
        self.sizes
            .iter()
            .map(|&size| {
                let head = sum;
                sum += size;
                head
            })
            .collect()
    }

    /// One past the last slot of each bucket.
    pub fn tails(&self) -> Vec<usize> {
        let mut sum = 0;
        self.sizes
            .iter()
            .map(|&size| {
                sum += size;
                sum
            })
            .collect()
    }
}

/// Returns a fresh slot buffer with `valleys` placed at the back of their
/// buckets. Within a bucket the relative order of `valleys` is kept.
pub fn seed_valleys(text: &[Symbol], bins: &Buckets, valleys: &[usize]) -> Vec<usize> {
    let mut sa = vec![EMPTY; text.len()];
    let mut tails = bins.tails();
    for &i in valleys.iter().rev() {
        let b = text[i].bucket();
        tails[b] -= 1;
        sa[tails[b]] = i;
    }
    sa
}

/// L pass: scanning left to right, every filled slot whose predecessor is
/// descending drops that predecessor at the front of its bucket.
pub fn induce_desc(
    mut sa: Vec<usize>,
    text: &[Symbol],
    stypes: &SuffixTypes,
    bins: &Buckets,
) -> Vec<usize> {
    let mut heads = bins.heads();
    for i in 0..sa.len() {
        let sufi = sa[i];
        if sufi == EMPTY || sufi == 0 || !stypes.is_desc(sufi - 1) {
            continue;
        }
        let b = text[sufi - 1].bucket();
        sa[heads[b]] = sufi - 1;
        heads[b] += 1;
    }
    sa
}

/// S pass: scanning right to left, every filled slot whose predecessor is
/// ascending drops that predecessor at the back of its bucket.
pub fn induce_asc(
    mut sa: Vec<usize>,
    text: &[Symbol],
    stypes: &SuffixTypes,
    bins: &Buckets,
) -> Vec<usize> {
    let mut tails = bins.tails();
    for i in (0..sa.len()).rev() {
        let sufi = sa[i];
        if sufi == EMPTY || sufi == 0 || !stypes.is_asc(sufi - 1) {
            continue;
        }
        let b = text[sufi - 1].bucket();
        tails[b] -= 1;
        sa[tails[b]] = sufi - 1;
    }
    sa
}

/// Runs both induce passes over a seeded buffer.
pub fn induce(sa: Vec<usize>, text: &[Symbol], stypes: &SuffixTypes, bins: &Buckets) -> Vec<usize> {
    let sa = induce_desc(sa, text, stypes, bins);
    induce_asc(sa, text, stypes, bins)
}
