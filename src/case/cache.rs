use crate::Memo;
use std::collections::BTreeMap;

/// Iterative Fibonacci.  `F(93)` is the largest that fits in a `u64`; past it the sum wraps.
pub fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return u64::from(n);
    }
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 2..=n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    b
}

/// The `Calculator` struct computes Fibonacci numbers for a selection of inputs, either from
/// scratch every time or through a [`Memo`].
///
/// `results` holds the answers to the latest request only, keyed by input, and is what a screen
/// would show.  `computations` counts every call that actually ran [`fibonacci`].
#[derive(Debug, Clone, Default, derive_getters::Getters)]
pub struct Calculator {
    results: BTreeMap<u32, u64>,
    #[getter(skip)]
    memo: Memo<u32, u64>,
    computations: usize,
}

impl Calculator {
    /// A calculator whose memo keeps at most `capacity` results, or all of them for `None`.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            memo: Memo::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Recomputes every number in `numbers`, no matter how many times it has been asked before.
    #[tracing::instrument(skip(self))]
    pub fn calculate_without_cache(&mut self, numbers: &[u32]) {
        self.results.clear();
        for &n in numbers {
            self.computations += 1;
            self.results.insert(n, fibonacci(n));
        }
    }

    /// Computes only the numbers the memo has not seen yet.
    #[tracing::instrument(skip(self))]
    pub fn calculate_with_cache(&mut self, numbers: &[u32]) {
        self.results.clear();
        for &n in numbers {
            let computations = &mut self.computations;
            let value = self.memo.get_or_compute(n, |&n| {
                *computations += 1;
                fibonacci(n)
            });
            self.results.insert(n, value);
        }
        tracing::trace!(
            "Memo at {} hits, {} misses.",
            self.memo.hits(),
            self.memo.misses()
        );
    }

    pub fn memo(&self) -> &Memo<u32, u64> {
        &self.memo
    }
}
