use anyhow::{ensure, Context, Result};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::ops::Index;
use std::path::Path;

use crate::sais::sais_table;

/// A suffix table is a sequence of lexicographically sorted suffixes.
///
/// The table always holds `text.len() + 1` entries: the empty suffix starting
/// at `text.len()` plays the role of a sentinel smaller than every symbol and
/// is always ranked first.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuffixTable<T> {
    text: Box<[T]>,
    table: Box<[u64]>,
}

impl<T: Ord> SuffixTable<T> {
    /// Creates a new suffix table for `text` by induced sorting, in `O(n)`
    /// time plus `O(n log n)` to rank the alphabet.
    pub fn new<S>(src: S) -> Self
    where
        S: Into<Box<[T]>>,
    {
        let text = src.into();
        let table = sais_table(&text);
        SuffixTable {
            text,
            table: table.into(),
        }
    }

    /// Creates a suffix table by comparing whole suffixes. This is
    /// `O(n^2 log n)` in the worst case and mostly useful as a reference.
    pub fn new_naive<S>(src: S) -> Self
    where
        S: Into<Box<[T]>>,
    {
        let text = src.into();
        let mut table: Vec<u64> = (0..=text.len() as u64).collect();
        table.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
        SuffixTable {
            text,
            table: table.into(),
        }
    }
}

impl<T> SuffixTable<T> {
    /// Creates a table from a text and a precomputed suffix array. No
    /// checks are made; see [`SuffixTable::is_sorted`].
    pub fn from_parts(text: Box<[T]>, table: Box<[u64]>) -> Self {
        SuffixTable { text, table }
    }

    /// Consumes the suffix table and returns the underlying text and table.
    pub fn into_parts(self) -> (Box<[T]>, Box<[u64]>) {
        (self.text, self.table)
    }

    #[inline]
    pub fn text(&self) -> &[T] {
        &self.text
    }

    /// The suffix array, sentinel suffix included.
    #[inline]
    pub fn table(&self) -> &[u64] {
        &self.table
    }

    /// Returns the number of symbols in the text. The table itself has one
    /// more entry for the sentinel suffix.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` iff `self.len() == 0`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the suffix at rank `i`.
    #[inline]
    pub fn suffix(&self, i: usize) -> &[T] {
        &self.text[self.table[i] as usize..]
    }

    /// Iterates over suffix start positions in sorted order.
    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.table.iter()
    }
}

impl<T: Ord> SuffixTable<T> {
    /// Compares the suffix starting at `pos` with `pattern`, looking at no
    /// more than `pattern.len()` symbols. A suffix that starts with
    /// `pattern` compares equal.
    fn cmp_suffix(&self, pos: usize, pattern: &[T]) -> Ordering {
        self.text[pos..]
            .iter()
            .take(pattern.len())
            .cmp(pattern.iter())
    }

    /// Length of the common prefix of the suffix at `pos` and `pattern`.
    fn common_prefix(&self, pos: usize, pattern: &[T]) -> usize {
        self.text[pos..]
            .iter()
            .zip(pattern)
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Rank of the first suffix that is not less than `pattern`.
    fn partition(&self, pattern: &[T]) -> usize {
        binary_search(&self.table, |&sufi| {
            self.cmp_suffix(sufi as usize, pattern) != Ordering::Less
        })
    }

    /// Returns the starting position of the first suffix, in sorted order,
    /// that is not less than `pattern`, or `self.len()` if every suffix is.
    ///
    /// The empty suffix at `self.len()` is the smallest one, so an empty
    /// pattern also yields `self.len()`.
    ///
    /// This runs in `O(mlogn)` time, where `m == pattern.len()`.
    pub fn lower_bound(&self, pattern: &[T]) -> usize {
        match self.table.get(self.partition(pattern)) {
            Some(&sufi) => sufi as usize,
            None => self.len(),
        }
    }

    /// Returns the length of the longest prefix of `pattern` that occurs
    /// anywhere in the text.
    ///
    /// Both suffixes around the lower-bound boundary are inspected: the one
    /// just below can share a longer prefix than the one at the boundary.
    pub fn lcp(&self, pattern: &[T]) -> usize {
        let rank = self.partition(pattern);
        let below = rank
            .checked_sub(1)
            .map_or(0, |r| self.common_prefix(self.table[r] as usize, pattern));
        let at = self
            .table
            .get(rank)
            .map_or(0, |&sufi| self.common_prefix(sufi as usize, pattern));
        below.max(at)
    }

    /// Returns true if and only if `pattern` is a substring of the text. The
    /// empty pattern is contained in every text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sais_table::SuffixTable;
    ///
    /// let sa = SuffixTable::new(b"The quick brown fox.".to_vec());
    /// assert!(sa.contains(b"quick"));
    /// assert!(!sa.contains(b"slow"));
    /// ```
    pub fn contains(&self, pattern: &[T]) -> bool {
        self.lcp(pattern) == pattern.len()
    }

    /// Determine start and end `table` ranks of suffixes that start with
    /// `query`.
    pub fn boundaries(&self, query: &[T]) -> (usize, usize) {
        let start = self.partition(query);
        let end = start
            + binary_search(&self.table[start..], |&sufi| {
                self.cmp_suffix(sufi as usize, query) != Ordering::Equal
            });
        (start, end)
    }

    /// Returns an unordered list of positions where `query` starts in the
    /// text. An empty query matches nowhere.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sais_table::SuffixTable;
    ///
    /// let sa = SuffixTable::new(b"The quick brown fox was very quick.".to_vec());
    /// assert_eq!(sa.positions(b"quick"), &[4, 29]);
    /// ```
    pub fn positions(&self, query: &[T]) -> &[u64] {
        if query.is_empty() {
            return &[];
        }
        let (start, end) = self.boundaries(query);
        &self.table[start..end]
    }

    /// Number of occurrences of `query` in the text.
    pub fn count(&self, query: &[T]) -> usize {
        self.positions(query).len()
    }

    /// Longest common prefix lengths of adjacent suffixes, computed with
    /// Kasai's algorithm in `O(n)`.
    ///
    /// Entry `k` is the LCP of the suffixes at ranks `k` and `k + 1`; the last
    /// entry has no successor and is 0.
    pub fn lcp_array(&self) -> Vec<usize> {
        let n = self.len();
        let mut rank = vec![0; n + 1];
        for (r, &sufi) in self.table.iter().enumerate() {
            rank[sufi as usize] = r;
        }

        let mut lcp = vec![0; n + 1];
        let mut h: usize = 0;
        for i in 0..n {
            // The sentinel suffix owns rank 0, so every real suffix has a
            // predecessor.
            let j = self.table[rank[i] - 1] as usize;
            h = h.saturating_sub(1);
            while i + h < n && j + h < n && self.text[i + h] == self.text[j + h] {
                h += 1;
            }
            lcp[rank[i] - 1] = h;
        }
        lcp
    }

    /// Number of distinct non-empty substrings of the text.
    ///
    /// Each suffix contributes its length minus the prefix it shares with its
    /// neighbour in sorted order.
    pub fn distinct_substrings(&self) -> usize {
        let n = self.len();
        let shared: usize = self.lcp_array().iter().sum();
        n * (n + 1) / 2 - shared
    }

    /// Returns `(position, length)` of a longest substring occurring at least
    /// twice. Among equally long repeats the one whose suffixes rank first is
    /// picked, reported at the leftmost of its two adjacent occurrences.
    /// Texts without repeats yield `(0, 0)`.
    pub fn longest_repeat(&self) -> (usize, usize) {
        let lcp = self.lcp_array();
        let best = lcp
            .iter()
            .enumerate()
            .max_by_key(|&(rank, &h)| (h, std::cmp::Reverse(rank)));
        match best {
            Some((rank, &h)) if h > 0 => {
                let pos = self.table[rank].min(self.table[rank + 1]) as usize;
                (pos, h)
            }
            _ => (0, 0),
        }
    }
}

impl<T: Ord + Sync> SuffixTable<T> {
    /// Checks if the suffix table is lexicographically sorted. This is always
    /// true for valid suffix tables.
    pub fn is_sorted(&self) -> bool {
        self.table.len() == self.text.len() + 1
            && self.table.par_iter().all(|&sufi| sufi as usize <= self.text.len())
            && self
                .table
                .par_windows(2)
                .all(|pair| self.text[pair[0] as usize..] < self.text[pair[1] as usize..])
    }

    pub fn batch_contains(&self, queries: &[Vec<T>]) -> Vec<bool> {
        queries.par_iter().map(|query| self.contains(query)).collect()
    }

    pub fn batch_lcp(&self, queries: &[Vec<T>]) -> Vec<usize> {
        queries.par_iter().map(|query| self.lcp(query)).collect()
    }
}

impl<T: Serialize> SuffixTable<T> {
    /// Writes the text and table to `path` with bincode.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl<T: DeserializeOwned> SuffixTable<T> {
    /// Reads a table written by [`SuffixTable::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let table: Self = bincode::deserialize_from(BufReader::new(file))
            .with_context(|| format!("failed to decode {}", path.display()))?;
        ensure!(
            table.table.len() == table.text.len() + 1,
            "corrupt suffix table: {} entries for a text of length {}",
            table.table.len(),
            table.text.len()
        );
        Ok(table)
    }
}

impl<T> Index<usize> for SuffixTable<T> {
    type Output = u64;

    #[inline]
    fn index(&self, rank: usize) -> &u64 {
        &self.table[rank]
    }
}

impl<'a, T> IntoIterator for &'a SuffixTable<T> {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for SuffixTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n-----------------------------------------")?;
        writeln!(f, "SUFFIX TABLE")?;
        for (rank, &sufstart) in self.table.iter().enumerate() {
            writeln!(f, "suffix[{}] {}", rank, sufstart)?;
        }
        writeln!(f, "-----------------------------------------")
    }
}

/// Binary search to find first element such that `pred(T) == true`.
///
/// Assumes that if `pred(xs[i]) == true` then `pred(xs[i+1]) == true`.
///
/// If all elements yield `pred(T) == false`, then `xs.len()` is returned.
fn binary_search<T, F>(xs: &[T], mut pred: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let (mut left, mut right) = (0, xs.len());
    while left < right {
        let mid = (left + right) / 2;
        if pred(&xs[mid]) {
            right = mid;
        } else {
            left = mid + 1;
        }
    }
    left
}
