//! Per-key majority counting

use std::collections::HashMap;
use std::hash::Hash;

/// Counts values per key and reports the most frequent one.
///
/// Ties go to the value that was seen first for that key, which keeps
/// album proposals stable across runs.
#[derive(Debug, Clone)]
pub struct Counter<K, V> {
    items: HashMap<K, Vec<(V, usize)>>,
}

impl<K, V> Default for Counter<K, V> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Eq> Counter<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, value: V) {
        let seen = self.items.entry(key).or_default();
        match seen.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => seen.push((value, 1)),
        }
    }

    pub fn most_common(&self, key: &K) -> Option<&V> {
        let seen = self.items.get(key)?;
        let mut best: Option<&(V, usize)> = None;
        for entry in seen {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::Counter;
    use proptest::prelude::*;

    #[test]
    fn picks_most_frequent_value() {
        let mut counter = Counter::new();
        for _ in 0..3 {
            counter.insert("k", "v1");
        }
        for _ in 0..5 {
            counter.insert("k", "v2");
        }
        assert_eq!(counter.most_common(&"k"), Some(&"v2"));
        assert_eq!(counter.most_common(&"missing"), None);
    }

    #[test]
    fn ties_prefer_first_seen() {
        let mut counter = Counter::new();
        counter.insert(1, "b");
        counter.insert(1, "a");
        counter.insert(1, "a");
        counter.insert(1, "b");
        assert_eq!(counter.most_common(&1), Some(&"b"));
    }

    proptest! {
        #[test]
        fn winner_has_maximal_count(values in proptest::collection::vec(0u8..5, 1..40)) {
            let mut counter = Counter::new();
            for v in &values {
                counter.insert((), *v);
            }
            let winner = *counter.most_common(&()).expect("non-empty");
            let count = |x: u8| values.iter().filter(|v| **v == x).count();
            let max = (0u8..5).map(count).max().unwrap_or(0);
            prop_assert_eq!(count(winner), max);
            let first_max = values.iter().copied().find(|v| count(*v) == max);
            prop_assert_eq!(Some(winner), first_max);
        }
    }
}
