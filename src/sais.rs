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

//! Suffix array construction by induced sorting (SA-IS).
//!
//! The text is first normalized to dense ranks and terminated by a unique
//! [`Symbol::Sentinel`]. Each level classifies suffixes, sorts the LMS
//! substrings by induction and names them. When two LMS substrings share a
//! name the level recurses on the names; otherwise the induced order of the
//! LMS substrings is already the order of their suffixes. The reduced text is
//! at most half as long as its parent, so recursion depth is bounded by
//! `log2(n)`.
pub mod bins;
pub mod types;

use log::debug;

use crate::alphabet::{normalize, Symbol};

use self::bins::{induce, seed_valleys, Buckets, EMPTY};
use self::types::SuffixTypes;

/// Builds the suffix array of `text` with an implicit sentinel appended.
///
/// The result has `text.len() + 1` entries; the first is always `text.len()`,
/// the position of the empty sentinel suffix.
pub fn sais_table<T: Ord>(text: &[T]) -> Vec<u64> {
    let mut symbols = normalize(text);
    symbols.push(Symbol::Sentinel);
    sais(&symbols, 0).into_iter().map(|i| i as u64).collect()
}

/// Suffix array of a sentinel-terminated rank sequence.
fn sais(text: &[Symbol], depth: usize) -> Vec<usize> {
    let n = text.len();
    let bins = Buckets::histogram(text);

    if bins.is_injective() {
        let mut sa = vec![0; n];
        for (i, c) in text.iter().enumerate() {
            sa[c.bucket()] = i;
        }
        return sa;
    }

    let stypes = SuffixTypes::classify(text);
    let valleys = stypes.valleys();

    // Sort the LMS substrings. Seeding in text order is enough here: only the
    // first character of each LMS suffix is known to be in place.
    let sa = induce(seed_valleys(text, &bins, &valleys), text, &stypes, &bins);
    let sorted: Vec<usize> = sa
        .into_iter()
        .filter(|&sufi| sufi != EMPTY && stypes.is_valley(sufi))
        .collect();

    let (reduced, names) = reduce(text, &stypes, &valleys, &sorted);
    debug!(
        "sais level {}: n={}, lms={}, names={}",
        depth,
        n,
        valleys.len(),
        names
    );

    // Order the LMS suffixes exactly, then induce the rest from them.
    let sorted: Vec<usize> = if names < valleys.len() {
        let order = sais(&reduced, depth + 1);
        order.into_iter().map(|r| valleys[r]).collect()
    } else {
        sorted
    };
    induce(seed_valleys(text, &bins, &sorted), text, &stypes, &bins)
}

/// Names each LMS substring by its rank among the distinct LMS substrings.
///
/// `sorted` holds the LMS positions in induced order, `valleys` the same
/// positions in text order. Returns the reduced text (one symbol per LMS
/// position, in text order, terminated by the sentinel) and the number of
/// distinct names including the sentinel.
fn reduce(
    text: &[Symbol],
    stypes: &SuffixTypes,
    valleys: &[usize],
    sorted: &[usize],
) -> (Vec<Symbol>, usize) {
    let mut names = vec![Symbol::Sentinel; text.len()];
    let mut name = 0;
    for (k, &sufi) in sorted.iter().enumerate() {
        if k > 0 {
            if k == 1 || !lms_substrings_equal(text, stypes, sorted[k - 1], sufi) {
                name += 1;
            }
            names[sufi] = Symbol::Char(name);
        }
    }
    let reduced = valleys.iter().map(|&i| names[i]).collect();
    (reduced, name + 1)
}

/// Compares the LMS substrings starting at `w1` and `w2`, each running up to
/// and including the next LMS position.
///
/// Two substrings are equal only when they reach their closing LMS position
/// at the same offset; a shared prefix of different length is not enough.
fn lms_substrings_equal(text: &[Symbol], stypes: &SuffixTypes, w1: usize, w2: usize) -> bool {
    if text[w1] != text[w2] {
        return false;
    }
    for j in 1.. {
        let (i1, i2) = (w1 + j, w2 + j);
        let (end1, end2) = (stypes.is_valley(i1), stypes.is_valley(i2));
        if end1 && end2 {
            return text[i1] == text[i2];
        }
        if end1 != end2 || text[i1] != text[i2] || stypes.ty(i1) != stypes.ty(i2) {
            return false;
        }
    }
    unreachable!("every LMS substring is closed by the sentinel")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Symbol::Char;
    use rand::Rng;

    fn naive<T: Ord>(s: &[T]) -> Vec<u64> {
        let mut sa: Vec<u64> = (0..=s.len() as u64).collect();
        sa.sort_by(|&a, &b| s[a as usize..].cmp(&s[b as usize..]));
        sa
    }

    // Helper function to verify if the suffix array is correct
    fn is_suffix_array_correct<T: Ord>(s: &[T], sa: &[u64]) -> bool {
        let n = s.len();
        if sa.len() != n + 1 {
            return false;
        }

        let mut used = vec![false; n + 1];
        for &pos in sa {
            let pos = pos as usize;
            if pos > n || used[pos] {
                return false;
            }
            used[pos] = true;
        }

        sa.windows(2)
            .all(|pair| s[pair[0] as usize..] < s[pair[1] as usize..])
    }

    fn check<T: Ord>(s: &[T]) {
        let sa = sais_table(s);
        assert!(is_suffix_array_correct(s, &sa));
        assert_eq!(sa, naive(s));
    }

    #[test]
    fn test_empty_string() {
        let s: Vec<u16> = vec![];
        assert_eq!(sais_table(&s), vec![0]);
    }

    #[test]
    fn test_single_character() {
        assert_eq!(sais_table(&[42u16]), vec![1, 0]);
    }

    #[test]
    fn test_two_characters() {
        check(&[2u16, 1]);
        check(&[1u16, 2]);
    }

    #[test]
    fn test_repeated_characters() {
        check(&[1u16, 1, 1, 1]);
        assert_eq!(sais_table(&[1u16, 1, 1, 1]), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_ascending_sequence() {
        check(&[1u16, 2, 3, 4, 5]);
    }

    #[test]
    fn test_descending_sequence() {
        check(&[5u16, 4, 3, 2, 1]);
    }

    #[test]
    fn test_random_sequence() {
        check(&[10u16, 5, 8, 3, 1, 7, 2, 9, 4, 6]);
    }

    #[test]
    fn test_large_values() {
        check(&[65535u16, 0, 32768, 1, 65534]);
        check(&[u64::MAX, 0, u64::MAX, u64::MAX - 1, 0]);
    }

    #[test]
    fn test_longer_sequence() {
        let s: Vec<u16> = (0..1000).map(|x| (x * 17 + 11) % 256).map(|x| x as u16).collect();
        check(&s);
    }

    #[test]
    fn test_banana() {
        assert_eq!(sais_table(b"banana"), vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_needs_recursion() {
        // Equal LMS substrings force at least one reduced level.
        check(b"mmiissiissiippii");
        check(b"abaabaabaabaaba");
        check(b"tgtgtgtgcaccg");
    }

    #[test]
    fn test_shared_prefix_different_length() {
        // "aab" and "aabb" share a prefix but close at different offsets.
        check(b"baabbaabbbaab");
        check(b"cabcabbcabbbcab");
    }

    #[test]
    fn test_fibonacci_words() {
        let (mut a, mut b) = (b"a".to_vec(), b"ab".to_vec());
        for _ in 0..12 {
            let next = [b.clone(), a].concat();
            a = b;
            b = next;
        }
        check(&b);
    }

    #[test]
    fn test_random_small_alphabets() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let len = rng.gen_range(0..200);
            let sigma = rng.gen_range(1..5u8);
            let s: Vec<u8> = (0..len).map(|_| rng.gen_range(0..sigma)).collect();
            check(&s);
        }
    }

    #[test]
    fn test_lms_substring_equality() {
        let mut text = normalize(b"abcabcabd");
        text.push(Symbol::Sentinel);
        let stypes = SuffixTypes::classify(&text);
        assert_eq!(stypes.valleys(), vec![3, 6, 9]);
        // "abca" at 3 and "abd$" at 6 differ.
        assert!(!lms_substrings_equal(&text, &stypes, 3, 6));
        assert!(lms_substrings_equal(&text, &stypes, 3, 3));
    }

    #[test]
    fn test_reduce_names() {
        let mut text = normalize(b"mmiissiissiippii");
        text.push(Symbol::Sentinel);
        let stypes = SuffixTypes::classify(&text);
        let valleys = stypes.valleys();
        let bins = Buckets::histogram(&text);
        let sa = induce(seed_valleys(&text, &bins, &valleys), &text, &stypes, &bins);
        let sorted: Vec<usize> = sa
            .into_iter()
            .filter(|&i| i != EMPTY && stypes.is_valley(i))
            .collect();
        let (reduced, names) = reduce(&text, &stypes, &valleys, &sorted);
        // "iissi" at 2 and 6 share a name, "iippii$" at 10 sorts below them.
        assert_eq!(valleys, vec![2, 6, 10, 16]);
        assert_eq!(
            reduced,
            vec![Char(2), Char(2), Char(1), Symbol::Sentinel]
        );
        assert_eq!(names, 3);
    }

    #[test]
    fn test_distinct_names_skip_recursion() {
        let mut text = normalize(b"banana");
        text.push(Symbol::Sentinel);
        let stypes = SuffixTypes::classify(&text);
        let valleys = stypes.valleys();
        let bins = Buckets::histogram(&text);
        let sa = induce(seed_valleys(&text, &bins, &valleys), &text, &stypes, &bins);
        let sorted: Vec<usize> = sa
            .into_iter()
            .filter(|&i| i != EMPTY && stypes.is_valley(i))
            .collect();
        let (reduced, names) = reduce(&text, &stypes, &valleys, &sorted);
        assert_eq!(valleys, vec![1, 3, 6]);
        assert_eq!(sorted, vec![6, 3, 1]);
        assert_eq!(reduced, vec![Char(2), Char(1), Symbol::Sentinel]);
        assert_eq!(names, valleys.len());

        // The induced LMS order alone yields the full table.
        let sa = induce(seed_valleys(&text, &bins, &sorted), &text, &stypes, &bins);
        assert_eq!(sa, vec![6, 5, 3, 1, 0, 4, 2]);
        assert_eq!(sais(&text, 0), vec![6, 5, 3, 1, 0, 4, 2]);
    }
}
