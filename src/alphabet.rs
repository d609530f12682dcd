/// A symbol of the rank sequence the construction works on.
///
/// The derived order places `Sentinel` below every `Char`, so the sentinel
/// suffix always sorts first without reserving a rank for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Sentinel,
    Char(usize),
}

impl Symbol {
    /// Index of the bucket this symbol sorts into. Ranks start at 1, so the
    /// sentinel owns bucket 0 on its own.
    #[inline]
    pub fn bucket(self) -> usize {
        match self {
            Symbol::Sentinel => 0,
            Symbol::Char(rank) => rank,
        }
    }
}

/// The sorted set of distinct symbols occurring in a text.
#[derive(Clone, Debug)]
pub struct Alphabet<'t, T> {
    symbols: Vec<&'t T>,
}

impl<'t, T: Ord> Alphabet<'t, T> {
    pub fn from_text(text: &'t [T]) -> Self {
        let mut symbols: Vec<&T> = text.iter().collect();
        symbols.sort_unstable();
        symbols.dedup();
        Alphabet { symbols }
    }

    /// Number of distinct symbols, not counting the sentinel.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the dense rank of `c`, or `None` if it never occurs in the text.
    pub fn rank(&self, c: &T) -> Option<Symbol> {
        self.symbols
            .binary_search(&c)
            .ok()
            .map(|i| Symbol::Char(i + 1))
    }

    /// Maps every symbol of `text` to its rank, or returns `None` if some
    /// symbol is missing from the alphabet.
    pub fn encode(&self, text: &[T]) -> Option<Vec<Symbol>> {
        text.iter().map(|c| self.rank(c)).collect()
    }
}

/// Replaces each symbol of `text` by its rank among the distinct symbols.
/// No sentinel is appended.
pub fn normalize<T: Ord>(text: &[T]) -> Vec<Symbol> {
    let alphabet = Alphabet::from_text(text);
    // Every symbol of `text` is in its own alphabet, so nothing is dropped.
    text.iter().filter_map(|c| alphabet.rank(c)).collect()
}
